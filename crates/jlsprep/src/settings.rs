//! `jlsprep.toml` settings.
//!
//! Lookup order: the file named by `--config`, then `jlsprep.toml` in the
//! workspace root, then `jlsprep/config.toml` in the user configuration
//! directory. Missing files mean defaults. Command-line flags are applied on
//! top of whatever was loaded.

use crate::cli::CliError;
use jlsprep_extract::{ExtractSettings, PrepareOptions};
use jlsprep_modgraph::CONFIG_FILE_NAME;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings file looked up in the workspace root.
pub const SETTINGS_FILE_NAME: &str = "jlsprep.toml";

/// Contents of a settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Name of the file written into each module directory.
    pub config_file_name: Option<String>,
    /// Directory names skipped while scanning, on top of the built-in ones.
    pub skip_dirs: Vec<String>,
    /// Gradle invocation settings.
    pub gradle: GradleSettings,
    /// Maven settings.
    pub maven: MavenSettings,
}

/// `[gradle]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GradleSettings {
    /// Command run when the workspace has no wrapper script.
    pub command: Option<String>,
    /// Arguments appended to every invocation.
    pub extra_args: Vec<String>,
}

/// `[maven]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MavenSettings {
    /// Local repository searched for dependency jars.
    pub repository: Option<PathBuf>,
}

impl Settings {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming `origin` when the text is not
    /// valid settings TOML.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, CliError> {
        toml::from_str(text).map_err(|e| {
            CliError::config_with_help(
                format!("invalid settings file {}: {}", origin.display(), e.message()),
                "Known keys: config_file_name, skip_dirs, [gradle] command, [gradle] extra_args, [maven] repository",
            )
        })
    }

    /// Reads and parses a settings file.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CliError::config(format!("cannot read settings file {}: {e}", path.display())))?;
        Self::parse(&text, path)
    }

    /// Loads the settings that apply to `workspace`.
    ///
    /// An explicit file must exist; the implicit locations are optional.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the chosen file cannot be read or
    /// parsed.
    pub fn discover(workspace: &Path, explicit: Option<&Path>) -> Result<Self, CliError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidates = [
            Some(workspace.join(SETTINGS_FILE_NAME)),
            dirs::config_dir().map(|dir| dir.join("jlsprep").join("config.toml")),
        ];
        match candidates.into_iter().flatten().find(|path| path.is_file()) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading settings");
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Builds the preparation options, applying `gradle` and `dry_run`
    /// from the command line over the file values.
    #[must_use]
    pub fn into_prepare_options(self, workspace: PathBuf, gradle: Option<String>, dry_run: bool) -> PrepareOptions {
        PrepareOptions {
            workspace,
            settings: ExtractSettings {
                gradle_command: gradle.or(self.gradle.command),
                gradle_extra_args: self.gradle.extra_args,
                skip_dirs: self.skip_dirs,
                maven_repository: self.maven.repository,
            },
            config_file_name: self
                .config_file_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| CONFIG_FILE_NAME.to_string()),
            dry_run,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_file() {
        let settings = Settings::parse(
            r#"
config_file_name = "jls.json"
skip_dirs = ["node_modules"]

[gradle]
command = "/opt/gradle/bin/gradle"
extra_args = ["--offline"]

[maven]
repository = "/srv/m2"
"#,
            Path::new("jlsprep.toml"),
        )
        .unwrap();

        assert_eq!(settings.config_file_name.as_deref(), Some("jls.json"));
        assert_eq!(settings.skip_dirs, vec!["node_modules".to_string()]);
        assert_eq!(settings.gradle.command.as_deref(), Some("/opt/gradle/bin/gradle"));
        assert_eq!(settings.gradle.extra_args, vec!["--offline".to_string()]);
        assert_eq!(settings.maven.repository, Some(PathBuf::from("/srv/m2")));
    }

    #[test]
    fn test_empty_file_is_defaults() {
        assert_eq!(Settings::parse("", Path::new("x")).unwrap(), Settings::default());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = Settings::parse("colour = true", Path::new("/ws/jlsprep.toml")).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
        assert!(err.to_string().contains("/ws/jlsprep.toml"));
    }

    #[test]
    fn test_workspace_file_is_found() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(SETTINGS_FILE_NAME), "skip_dirs = [\"out\"]").unwrap();

        let settings = Settings::discover(temp.path(), None).unwrap();
        assert_eq!(settings.skip_dirs, vec!["out".to_string()]);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let temp = TempDir::new().unwrap();
        let err = Settings::discover(temp.path(), Some(&temp.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[test]
    fn test_command_line_overrides_file() {
        let settings = Settings {
            config_file_name: Some("jls.json".to_string()),
            skip_dirs: vec!["out".to_string()],
            gradle: GradleSettings {
                command: Some("gradle-from-file".to_string()),
                extra_args: vec!["--offline".to_string()],
            },
            maven: MavenSettings {
                repository: Some(PathBuf::from("/srv/m2")),
            },
        };

        let options = settings.into_prepare_options(PathBuf::from("/ws"), Some("gradle-from-flag".to_string()), true);
        assert_eq!(options.workspace, PathBuf::from("/ws"));
        assert_eq!(options.settings.gradle_command.as_deref(), Some("gradle-from-flag"));
        assert_eq!(options.settings.gradle_extra_args, vec!["--offline".to_string()]);
        assert_eq!(options.settings.skip_dirs, vec!["out".to_string()]);
        assert_eq!(options.settings.maven_repository, Some(PathBuf::from("/srv/m2")));
        assert_eq!(options.config_file_name, "jls.json");
        assert!(options.dry_run);
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let options = Settings::default().into_prepare_options(PathBuf::from("."), None, false);
        assert_eq!(options.config_file_name, CONFIG_FILE_NAME);
        assert_eq!(options.settings.gradle_command, None);
        assert!(!options.dry_run);
    }
}
