//! The per-module configuration record handed to the emitter.

use crate::closure::ModuleClosure;
use crate::paths::resolve_path_string;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Resolved build configuration for one module.
///
/// All paths are absolute and normalized, lists are deduplicated and keep
/// the order in which the closure first reached each entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConfiguration {
    /// Compilation source directories.
    pub sources: Vec<String>,
    /// Classpath entries.
    pub class_path: Vec<String>,
    /// Compiled-output directory, when the module declares one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,
}

impl ResolvedConfiguration {
    /// Builds a configuration from raw paths, resolving each against
    /// `workspace_root`.
    ///
    /// Entries that differ only before normalization collapse into one.
    #[must_use]
    pub fn from_raw<'p, S, C>(workspace_root: &Path, sources: S, class_path: C, output_dir: Option<&Path>) -> Self
    where
        S: IntoIterator<Item = &'p PathBuf>,
        C: IntoIterator<Item = &'p PathBuf>,
    {
        Self {
            sources: normalize_all(workspace_root, sources),
            class_path: normalize_all(workspace_root, class_path),
            output_directory: output_dir.map(|dir| resolve_path_string(workspace_root, dir)),
        }
    }

    /// Builds the configuration of a computed closure.
    #[must_use]
    pub fn from_closure(workspace_root: &Path, closure: &ModuleClosure) -> Self {
        Self::from_raw(
            workspace_root,
            &closure.sources,
            &closure.class_path,
            closure.output_dir.as_deref(),
        )
    }

    /// Renders the configuration as pretty JSON with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        let mut rendered = serde_json::to_string_pretty(self)?;
        rendered.push('\n');
        Ok(rendered)
    }
}

fn normalize_all<'p, I>(workspace_root: &Path, paths: I) -> Vec<String>
where
    I: IntoIterator<Item = &'p PathBuf>,
{
    paths
        .into_iter()
        .map(|path| resolve_path_string(workspace_root, path))
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}
