//! Per-run extraction state.

use jlsprep_modgraph::{DescriptorFrontier, resolve_path};
use std::path::{Path, PathBuf};

/// Directory names never descended into while scanning for descriptors.
pub const DEFAULT_SKIP_DIRS: &[&str] = &["build", "target"];

/// Knobs shared by all extractors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSettings {
    /// Gradle command used when no wrapper script is found.
    ///
    /// `None` selects `gradle` (`gradle.bat` on Windows).
    pub gradle_command: Option<String>,
    /// Extra arguments appended to every Gradle invocation.
    pub gradle_extra_args: Vec<String>,
    /// Directory names skipped in addition to [`DEFAULT_SKIP_DIRS`] and
    /// dot-directories.
    pub skip_dirs: Vec<String>,
    /// Local Maven repository searched for dependency jars.
    ///
    /// `None` selects `~/.m2/repository`.
    pub maven_repository: Option<PathBuf>,
}

impl ExtractSettings {
    /// The Gradle command to run when the workspace has no wrapper.
    #[must_use]
    pub fn gradle_command(&self) -> &str {
        match self.gradle_command.as_deref() {
            Some(command) if !command.trim().is_empty() => command,
            _ if cfg!(windows) => "gradle.bat",
            _ => "gradle",
        }
    }

    /// The local Maven repository, if one can be located.
    #[must_use]
    pub fn maven_repository(&self) -> Option<PathBuf> {
        match &self.maven_repository {
            Some(repository) if !repository.as_os_str().is_empty() => Some(repository.clone()),
            _ => dirs::home_dir().map(|home| home.join(".m2").join("repository")),
        }
    }

    /// Whether a directory with this name is excluded from descriptor scans.
    #[must_use]
    pub fn skips_dir(&self, name: &str) -> bool {
        name.starts_with('.') || DEFAULT_SKIP_DIRS.contains(&name) || self.skips_configured_dir(name)
    }

    /// Whether a directory with this name is listed in [`Self::skip_dirs`].
    #[must_use]
    pub fn skips_configured_dir(&self, name: &str) -> bool {
        self.skip_dirs.iter().any(|d| d == name)
    }
}

/// State created once per run and handed to every extractor.
///
/// Holds the workspace root, the descriptor frontier shared by all
/// extractors, and the warnings collected so far.
#[derive(Debug)]
pub struct ExtractionContext {
    root: PathBuf,
    settings: ExtractSettings,
    pub(crate) frontier: DescriptorFrontier,
    pub(crate) warnings: Vec<String>,
    pub(crate) skipped_descriptors: usize,
}

impl ExtractionContext {
    /// Creates the context for the workspace at `root`.
    ///
    /// `root` is made absolute and normalized.
    #[must_use]
    pub fn new(root: &Path, settings: ExtractSettings) -> Self {
        let root = resolve_path(root, Path::new(""));
        Self {
            frontier: DescriptorFrontier::new(&root),
            root,
            settings,
            warnings: Vec::new(),
            skipped_descriptors: 0,
        }
    }

    /// Absolute workspace root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Extraction settings.
    #[must_use]
    pub const fn settings(&self) -> &ExtractSettings {
        &self.settings
    }

    /// Descriptors accounted for so far.
    #[must_use]
    pub const fn frontier(&self) -> &DescriptorFrontier {
        &self.frontier
    }

    /// Warnings surfaced by extractors so far.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Number of descriptors skipped because they were already accounted for.
    #[must_use]
    pub const fn skipped_descriptors(&self) -> usize {
        self.skipped_descriptors
    }

    /// Records a warning for the operator.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(warning = %message, "Extraction warning");
        self.warnings.push(message);
    }

    /// Consumes the context, returning the collected warnings.
    #[must_use]
    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}
