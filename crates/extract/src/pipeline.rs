//! One preparation run: extract, resolve, emit.

use crate::context::{ExtractSettings, ExtractionContext};
use crate::error::{Error, Result};
use crate::extractor::{Extractor, run_extractor};
use crate::fallback::SourceFallbackExtractor;
use crate::gradle::GradleExtractor;
use crate::maven::MavenExtractor;
use jlsprep_modgraph::{CONFIG_FILE_NAME, ConfigWriter, EmitResult, ModuleIndex, WorkspaceResolver, resolve_path};
use std::path::{Path, PathBuf};

/// Inputs of a preparation run.
#[derive(Debug, Clone)]
pub struct PrepareOptions {
    /// Workspace root; relative paths are resolved against the current directory.
    pub workspace: PathBuf,
    /// Extraction settings.
    pub settings: ExtractSettings,
    /// Name of the file written into each module directory.
    pub config_file_name: String,
    /// Report what would be written without writing.
    pub dry_run: bool,
}

impl PrepareOptions {
    /// Options with default settings for `workspace`.
    #[must_use]
    pub fn new(workspace: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
            settings: ExtractSettings::default(),
            config_file_name: CONFIG_FILE_NAME.to_string(),
            dry_run: false,
        }
    }
}

/// Result of a preparation run.
#[derive(Debug)]
pub struct PrepareReport {
    /// Absolute workspace root.
    pub root: PathBuf,
    /// Extractor that produced the modules.
    pub extractor: &'static str,
    /// One entry per emitted module configuration.
    pub files: Vec<EmitResult>,
    /// Warnings surfaced by extractors.
    pub warnings: Vec<String>,
    /// Descriptors skipped because another descriptor accounted for them.
    pub skipped_descriptors: usize,
}

impl PrepareReport {
    /// Number of configurations that could not be written.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.files.iter().filter(|f| !f.is_ok()).count()
    }
}

/// Extractors tried in order; the first to produce any module wins.
#[must_use]
pub fn default_extractors() -> Vec<Box<dyn Extractor>> {
    vec![
        Box::new(MavenExtractor),
        Box::new(GradleExtractor),
        Box::new(SourceFallbackExtractor),
    ]
}

/// Prepares the workspace with [`default_extractors`].
///
/// # Errors
///
/// Returns an error if the workspace root is not a directory or the
/// configuration file name is unusable. Extraction
/// and write failures are reported per descriptor and per module instead.
pub fn prepare_workspace(options: &PrepareOptions) -> Result<PrepareReport> {
    prepare_with(options, &default_extractors())
}

/// Prepares the workspace with the given extractor chain.
///
/// # Errors
///
/// Returns an error if the workspace root is not a directory or the
/// configuration file name is not a plain file name.
pub fn prepare_with(options: &PrepareOptions, extractors: &[Box<dyn Extractor>]) -> Result<PrepareReport> {
    let file_name = options.config_file_name.as_str();
    if file_name.is_empty() || file_name == "." || file_name == ".." || file_name.contains(['/', '\\']) {
        return Err(Error::config(format!(
            "configuration file name '{file_name}' must be a plain file name"
        )));
    }

    let root = resolve_path(&options.workspace, Path::new(""));
    if !root.is_dir() {
        return Err(Error::Scan {
            root,
            message: "workspace is not a directory".to_string(),
        });
    }

    let mut ctx = ExtractionContext::new(&root, options.settings.clone());
    let mut modules = Vec::new();
    let mut used = "none";
    for extractor in extractors {
        modules = run_extractor(extractor.as_ref(), &mut ctx);
        if !modules.is_empty() {
            used = extractor.name();
            break;
        }
    }

    let index = ModuleIndex::from_modules(modules);
    tracing::info!(extractor = used, modules = index.len(), "Extraction complete");

    let resolved = WorkspaceResolver::new(&index, &root).resolve_all();
    let writer = ConfigWriter::new(&root)
        .with_file_name(options.config_file_name.clone())
        .dry_run(options.dry_run);
    let files = writer.emit_all(&resolved);

    let skipped_descriptors = ctx.skipped_descriptors();
    Ok(PrepareReport {
        root,
        extractor: used,
        files,
        warnings: ctx.into_warnings(),
        skipped_descriptors,
    })
}
