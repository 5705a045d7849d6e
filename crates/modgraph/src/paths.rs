//! Path normalization against a workspace root.

use std::path::{Component, Path, PathBuf};

/// Resolves `path` against `root` and normalizes it lexically.
///
/// Absolute inputs ignore `root`. `.` components are dropped and `..`
/// components pop their parent; symlinks are not followed and the path is
/// not required to exist. A relative `root` is made absolute against the
/// current directory first.
#[must_use]
pub fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        absolute_root(root).join(path)
    };
    normalize(&joined)
}

/// Same as [`resolve_path`], rendered as a string.
#[must_use]
pub fn resolve_path_string(root: &Path, path: &Path) -> String {
    resolve_path(root, path).to_string_lossy().into_owned()
}

fn absolute_root(root: &Path) -> PathBuf {
    let root = if root.as_os_str().is_empty() { Path::new(".") } else { root };
    if root.is_absolute() {
        return root.to_path_buf();
    }
    std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                // `/..` stays `/`
                if !matches!(out.components().next_back(), Some(Component::RootDir) | None) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
