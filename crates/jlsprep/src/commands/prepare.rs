//! `jlsprep prepare`: extract, resolve and write configurations.

use crate::cli::{CliError, OkEnvelope};
use crate::settings::Settings;
use jlsprep_extract::{PrepareReport, prepare_workspace};
use jlsprep_modgraph::resolve_path;
use serde::Serialize;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Arguments of `jlsprep prepare`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareRequest {
    /// Workspace root.
    pub workspace: PathBuf,
    /// Explicit settings file.
    pub config: Option<PathBuf>,
    /// Report without writing.
    pub dry_run: bool,
    /// Gradle command override.
    pub gradle: Option<String>,
}

/// One emitted configuration in JSON output.
#[derive(Debug, Serialize)]
struct FileEntry {
    module: String,
    path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// JSON payload of a preparation run.
#[derive(Debug, Serialize)]
struct PrepareSummary {
    root: PathBuf,
    extractor: &'static str,
    files: Vec<FileEntry>,
    warnings: Vec<String>,
    skipped_descriptors: usize,
    failures: usize,
}

impl From<PrepareReport> for PrepareSummary {
    fn from(report: PrepareReport) -> Self {
        let failures = report.failures();
        let files = report
            .files
            .into_iter()
            .map(|file| {
                let (status, error) = match file.outcome {
                    Ok(status) => (Some(status.to_string()), None),
                    Err(e) => (None, Some(e.to_string())),
                };
                FileEntry {
                    module: file.id.to_string(),
                    path: file.path,
                    status,
                    error,
                }
            })
            .collect();
        Self {
            root: report.root,
            extractor: report.extractor,
            files,
            warnings: report.warnings,
            skipped_descriptors: report.skipped_descriptors,
            failures,
        }
    }
}

/// Runs a preparation and renders its report.
///
/// Per-module write failures are part of the report, not errors.
///
/// # Errors
///
/// Returns a [`CliError`] if the settings cannot be loaded or the workspace
/// is not a directory.
pub fn execute_prepare(request: PrepareRequest, json_mode: bool) -> Result<String, CliError> {
    let started = Instant::now();
    let workspace = resolve_path(&request.workspace, Path::new(""));
    let settings = Settings::discover(&workspace, request.config.as_deref())?;
    let options = settings.into_prepare_options(workspace, request.gradle, request.dry_run);

    let report = prepare_workspace(&options)?;
    crate::perf_event!("prepare", started.elapsed());

    let summary = PrepareSummary::from(report);
    if json_mode {
        serde_json::to_string(&OkEnvelope::new(&summary))
            .map_err(|e| CliError::prepare(format!("JSON serialization failed: {e}")))
    } else {
        Ok(render_text(&summary))
    }
}

fn render_text(summary: &PrepareSummary) -> String {
    let mut out = String::new();
    for file in &summary.files {
        match (&file.status, &file.error) {
            (Some(status), _) => {
                let _ = writeln!(out, "{status}: {}", file.path.display());
            }
            (None, error) => {
                let _ = writeln!(
                    out,
                    "Failed: {} ({})",
                    file.path.display(),
                    error.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }
    for warning in &summary.warnings {
        let _ = writeln!(out, "warning: {warning}");
    }
    let _ = write!(
        out,
        "Prepared {} module(s) in {} using the {} extractor",
        summary.files.len() - summary.failures,
        summary.root.display(),
        summary.extractor
    );
    if summary.failures > 0 {
        let _ = write!(out, ", {} failed", summary.failures);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn request(workspace: &Path) -> PrepareRequest {
        PrepareRequest {
            workspace: workspace.to_path_buf(),
            config: None,
            dry_run: false,
            gradle: None,
        }
    }

    #[test]
    fn test_prepare_source_only_workspace() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("src/main/java")).unwrap();

        let output = execute_prepare(request(temp.path()), false).unwrap();
        assert!(output.starts_with("Created: "));
        assert!(output.contains("using the sources extractor"));
        assert!(temp.path().join(".jls-config").is_file());
    }

    #[test]
    fn test_settings_file_name_is_used() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("java")).unwrap();
        fs::write(temp.path().join("jlsprep.toml"), "config_file_name = \"jls.json\"\n").unwrap();

        execute_prepare(request(temp.path()), false).unwrap();
        assert!(temp.path().join("jls.json").is_file());
        assert!(!temp.path().join(".jls-config").exists());
    }

    #[test]
    fn test_json_summary() {
        let temp = TempDir::new().unwrap();
        let output = execute_prepare(
            PrepareRequest {
                dry_run: true,
                ..request(temp.path())
            },
            true,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["data"]["extractor"], "sources");
        assert_eq!(value["data"]["files"][0]["module"], "default-group/workspace");
        assert_eq!(value["data"]["files"][0]["status"], "Would create");
        assert_eq!(value["data"]["failures"], 0);
    }

    #[test]
    fn test_missing_workspace_is_config_error() {
        let temp = TempDir::new().unwrap();
        let err = execute_prepare(request(&temp.path().join("absent")), false).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[test]
    fn test_render_text_reports_failures() {
        let summary = PrepareSummary {
            root: PathBuf::from("/ws"),
            extractor: "gradle",
            files: vec![
                FileEntry {
                    module: "g/a".to_string(),
                    path: PathBuf::from("/ws/a/.jls-config"),
                    status: Some("Updated".to_string()),
                    error: None,
                },
                FileEntry {
                    module: "g/b".to_string(),
                    path: PathBuf::from("/ws/b/.jls-config"),
                    status: None,
                    error: Some("permission denied".to_string()),
                },
            ],
            warnings: vec!["b: deprecated".to_string()],
            skipped_descriptors: 0,
            failures: 1,
        };

        assert_eq!(
            render_text(&summary),
            "Updated: /ws/a/.jls-config\n\
             Failed: /ws/b/.jls-config (permission denied)\n\
             warning: b: deprecated\n\
             Prepared 1 module(s) in /ws using the gradle extractor, 1 failed"
        );
    }
}
