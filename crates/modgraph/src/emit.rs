//! Writing resolved configurations next to each module.
//!
//! Every module gets one file in its project directory. Writes compare the
//! rendered content with what is already on disk, so an unchanged workspace
//! leaves files untouched. A failed write is reported for that module only.

use crate::config::ResolvedConfiguration;
use crate::error::{Error, Result};
use crate::module::ModuleId;
use crate::paths::resolve_path;
use crate::resolver::ResolvedModule;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default name of the per-module configuration file.
pub const CONFIG_FILE_NAME: &str = ".jls-config";

/// Status of a configuration file operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// File was newly created.
    Created,
    /// File existed and was updated with new content.
    Updated,
    /// File existed and content was unchanged.
    Unchanged,
    /// Would be created (dry-run mode).
    WouldCreate,
    /// Would be updated (dry-run mode).
    WouldUpdate,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Updated => write!(f, "Updated"),
            Self::Unchanged => write!(f, "Unchanged"),
            Self::WouldCreate => write!(f, "Would create"),
            Self::WouldUpdate => write!(f, "Would update"),
        }
    }
}

/// Outcome of emitting one module's configuration.
#[derive(Debug)]
pub struct EmitResult {
    /// The module the configuration belongs to.
    pub id: ModuleId,
    /// Target file.
    pub path: PathBuf,
    /// What happened, or why it failed.
    pub outcome: Result<FileStatus>,
}

impl EmitResult {
    /// Whether the write (or dry-run check) succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Writes configurations into module project directories.
#[derive(Debug, Clone)]
pub struct ConfigWriter {
    workspace_root: PathBuf,
    file_name: String,
    dry_run: bool,
}

impl ConfigWriter {
    /// Creates a writer for the workspace at `workspace_root`.
    #[must_use]
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            file_name: CONFIG_FILE_NAME.to_string(),
            dry_run: false,
        }
    }

    /// Overrides the configuration file name.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Only report what would change, without writing.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Path of the configuration file for a module rooted at `project_dir`.
    #[must_use]
    pub fn target_path(&self, project_dir: &Path) -> PathBuf {
        resolve_path(&self.workspace_root, project_dir).join(&self.file_name)
    }

    /// Writes `config` for the module rooted at `project_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be rendered or the file
    /// cannot be written.
    pub fn write(&self, project_dir: &Path, config: &ResolvedConfiguration) -> Result<FileStatus> {
        let path = self.target_path(project_dir);
        let content = config.to_pretty_json().map_err(|source| Error::Json {
            source,
            path: Some(path.clone()),
        })?;

        if self.dry_run {
            return Ok(preview(&path, &content));
        }
        write_config_file(&path, &content)
    }

    /// Writes every module's configuration, isolating failures per module.
    #[must_use]
    pub fn emit_all(&self, modules: &[ResolvedModule]) -> Vec<EmitResult> {
        modules
            .iter()
            .map(|module| {
                let path = self.target_path(&module.project_dir);
                let outcome = self.write(&module.project_dir, &module.configuration);
                match &outcome {
                    Ok(status) => tracing::info!(
                        module = %module.id,
                        path = %path.display(),
                        status = %status,
                        "Processed configuration file"
                    ),
                    Err(e) => tracing::warn!(
                        module = %module.id,
                        path = %path.display(),
                        error = %e,
                        "Failed to save configuration"
                    ),
                }
                EmitResult {
                    id: module.id.clone(),
                    path,
                    outcome,
                }
            })
            .collect()
    }
}

/// Whether the file at `path` already holds exactly `content`.
///
/// An existing file that cannot be read counts as different so it gets
/// replaced.
fn matches_existing(path: &Path, content: &str) -> bool {
    match std::fs::read(path) {
        Ok(existing) => existing == content.as_bytes(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "Existing configuration unreadable");
            false
        }
    }
}

fn preview(path: &Path, content: &str) -> FileStatus {
    if !path.exists() {
        FileStatus::WouldCreate
    } else if matches_existing(path, content) {
        FileStatus::Unchanged
    } else {
        FileStatus::WouldUpdate
    }
}

fn write_config_file(path: &Path, content: &str) -> Result<FileStatus> {
    let status = if path.exists() {
        if matches_existing(path, content) {
            return Ok(FileStatus::Unchanged);
        }
        FileStatus::Updated
    } else {
        FileStatus::Created
    };

    std::fs::write(path, content).map_err(|e| Error::io(e, path, "writing configuration"))?;
    Ok(status)
}
