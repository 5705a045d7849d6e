//! Source-directory fallback for workspaces without a recognized build.

use crate::context::ExtractionContext;
use crate::error::Result;
use crate::extractor::{Extraction, Extractor};
use crate::scan;
use jlsprep_modgraph::{DEFAULT_GROUP, Module};
use std::path::{Path, PathBuf};

/// Name of directories treated as source roots.
pub const SOURCE_DIR_NAME: &str = "java";

/// Artifact name of the synthetic workspace module.
pub const WORKSPACE_ARTIFACT: &str = "workspace";

/// Describes the whole workspace as one module whose sources are every
/// `java` directory, or the root itself when there are none.
///
/// Build output and dot-directories are searched as well.
///
/// Its only descriptor is the workspace root.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceFallbackExtractor;

impl Extractor for SourceFallbackExtractor {
    fn name(&self) -> &'static str {
        "sources"
    }

    fn descriptors(&self, ctx: &ExtractionContext) -> Result<Vec<PathBuf>> {
        Ok(vec![ctx.root().to_path_buf()])
    }

    fn extract(&self, ctx: &ExtractionContext, descriptor: &Path) -> Result<Extraction> {
        let mut dirs = scan::find_dirs(descriptor, SOURCE_DIR_NAME, ctx.settings())?;
        if dirs.is_empty() {
            tracing::debug!(root = %descriptor.display(), "No java directories, using workspace root");
            dirs.push(descriptor.to_path_buf());
        }

        let module = dirs.into_iter().fold(
            Module::new(DEFAULT_GROUP, WORKSPACE_ARTIFACT).with_project_dir(descriptor),
            |module, dir| module.with_source_dir(format!("{DEFAULT_GROUP}/{WORKSPACE_ARTIFACT}"), dir),
        );

        Ok(Extraction {
            modules: vec![module],
            warnings: Vec::new(),
        })
    }
}
