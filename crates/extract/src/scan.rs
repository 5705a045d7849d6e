//! Filesystem scanning for build descriptors and source directories.
//!
//! Descriptor scans prune build output directories (`build`, `target`),
//! dot-directories and any configured extras. Directory scans walk every
//! directory except the configured extras. The scan root itself is never
//! pruned, whatever its name.

use crate::context::ExtractSettings;
use crate::error::{Error, Result};
use jlsprep_modgraph::resolve_path;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Kind of entry a scan collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    File,
    Dir,
}

/// Finds every file named `file_name` under `root`.
///
/// Results are absolute, normalized and sorted.
///
/// # Errors
///
/// Returns an error if `root` is not a readable directory.
pub fn find_files(root: &Path, file_name: &str, settings: &ExtractSettings) -> Result<Vec<PathBuf>> {
    scan(root, file_name, Kind::File, settings)
}

/// Finds every directory named `dir_name` under `root`, excluding `root`.
///
/// Build output and dot-directories are searched too; only the configured
/// [`ExtractSettings::skip_dirs`] are pruned. Results are absolute,
/// normalized and sorted.
///
/// # Errors
///
/// Returns an error if `root` is not a readable directory.
pub fn find_dirs(root: &Path, dir_name: &str, settings: &ExtractSettings) -> Result<Vec<PathBuf>> {
    scan(root, dir_name, Kind::Dir, settings)
}

fn scan(root: &Path, name: &str, kind: Kind, settings: &ExtractSettings) -> Result<Vec<PathBuf>> {
    let root = resolve_path(root, Path::new(""));
    if !root.is_dir() {
        return Err(Error::Scan {
            root,
            message: "not a directory".to_string(),
        });
    }

    let walker = WalkDir::new(&root).follow_links(false);
    let mut found: Vec<PathBuf> = walker
        .into_iter()
        .filter_entry(|e| !is_pruned(e, kind, settings))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::trace!(error = %e, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.depth() > 0 && entry.file_name() == name && matches_kind(entry, kind))
        .map(|entry| resolve_path(&root, entry.path()))
        .collect();

    found.sort();
    found.dedup();
    tracing::debug!(root = %root.display(), name, count = found.len(), "Scan complete");
    Ok(found)
}

fn is_pruned(entry: &DirEntry, kind: Kind, settings: &ExtractSettings) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    match kind {
        Kind::File => settings.skips_dir(&name),
        Kind::Dir => settings.skips_configured_dir(&name),
    }
}

fn matches_kind(entry: &DirEntry, kind: Kind) -> bool {
    match kind {
        Kind::File => entry.file_type().is_file(),
        Kind::Dir => entry.file_type().is_dir(),
    }
}
