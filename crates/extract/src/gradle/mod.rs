//! Gradle extraction.
//!
//! Gradle is driven with a bundled init script that adds a task printing
//! each project's metadata as `SRCLIB-*` lines. A root build file usually
//! reports every sub-project in one run, so it is processed first.

mod protocol;
mod wrapper;

pub use protocol::MetaParser;
pub use wrapper::{GradleInvocation, find_wrapper, wrapper_name};

use crate::context::ExtractionContext;
use crate::error::{Error, Result};
use crate::extractor::{Extraction, Extractor};
use crate::scan;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Name of the task added by the init script.
pub const TASK_NAME: &str = "srclibCollectMetaInformation";

/// Build file name looked for in every directory.
pub const BUILD_FILE: &str = "build.gradle";

/// Settings file used as the root descriptor when there is no root build file.
pub const SETTINGS_FILE: &str = "settings.gradle";

const INIT_SCRIPT: &str = include_str!("metainfo.gradle");

/// Extracts modules by running Gradle on each build file.
#[derive(Debug, Clone, Copy, Default)]
pub struct GradleExtractor;

impl GradleExtractor {
    fn write_init_script() -> Result<tempfile::NamedTempFile> {
        let mut script = tempfile::Builder::new()
            .prefix("srclib-collect-meta")
            .suffix(".gradle")
            .tempfile()
            .map_err(|e| Error::io(e, std::env::temp_dir(), "creating init script"))?;
        script
            .write_all(INIT_SCRIPT.as_bytes())
            .map_err(|e| Error::io(e, script.path(), "writing init script"))?;
        Ok(script)
    }
}

impl Extractor for GradleExtractor {
    fn name(&self) -> &'static str {
        "gradle"
    }

    fn descriptors(&self, ctx: &ExtractionContext) -> Result<Vec<PathBuf>> {
        let root = ctx.root();
        let mut descriptors = Vec::new();

        let root_descriptor = [BUILD_FILE, SETTINGS_FILE]
            .into_iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file());
        if let Some(root_descriptor) = root_descriptor {
            descriptors.push(root_descriptor);
        }

        for found in scan::find_files(root, BUILD_FILE, ctx.settings())? {
            if !descriptors.contains(&found) {
                descriptors.push(found);
            }
        }
        Ok(descriptors)
    }

    fn extract(&self, ctx: &ExtractionContext, descriptor: &Path) -> Result<Extraction> {
        let work_dir = descriptor.parent().unwrap_or_else(|| ctx.root());
        let wrapper = find_wrapper(ctx.root(), descriptor);
        let script = Self::write_init_script()?;

        let settings = ctx.settings();
        let invocation = GradleInvocation::new(
            wrapper.as_deref(),
            settings.gradle_command(),
            script.path(),
            &settings.gradle_extra_args,
        );
        tracing::debug!(
            command = %invocation.command_line(),
            work_dir = %work_dir.display(),
            "Running gradle"
        );

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(work_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| Error::ProcessSpawn {
                program: invocation.program.clone(),
                source,
            })?;

        if !output.status.success() {
            tracing::debug!(status = %output.status, descriptor = %descriptor.display(), "gradle exited with failure");
        }

        let mut parser = MetaParser::new();
        parser.feed_reader(output.stdout.as_slice())?;
        if !parser.failed() {
            parser.feed_reader(output.stderr.as_slice())?;
        }
        parser.finish(descriptor)
    }
}
