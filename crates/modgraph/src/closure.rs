//! Transitive closure over intra-workspace module dependencies.
//!
//! The closure of a module is the merged set of source directories and
//! classpath entries of every module reachable from it through module
//! edges and aliased external coordinates. Traversal is a depth-first walk
//! with a visited set scoped to one root, so cycles contribute each module
//! exactly once.

use crate::alias::split_external;
use crate::index::{Classification, ModuleIndex};
use crate::module::{Module, ModuleId};
use crate::paths::resolve_path;
use indexmap::IndexSet;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Answers whether an absolute path is an existing directory.
///
/// Classpath entries that are directories are also compilation inputs.
pub trait DirectoryCheck: Sync {
    /// Whether `path` denotes an existing directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// [`DirectoryCheck`] backed by the filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsCheck;

impl DirectoryCheck for FsCheck {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

impl<F> DirectoryCheck for F
where
    F: Fn(&Path) -> bool + Sync,
{
    fn is_dir(&self, path: &Path) -> bool {
        self(path)
    }
}

/// Merged contributions of every module reachable from a root module.
///
/// Paths are raw (as reported by extractors); see
/// [`ResolvedConfiguration`](crate::ResolvedConfiguration) for the
/// absolute, normalized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleClosure {
    /// The module the closure was computed for.
    pub root: ModuleId,
    /// Visited modules in traversal order, starting with `root`.
    pub members: Vec<ModuleId>,
    /// Source directories, including directory classpath entries.
    pub sources: IndexSet<PathBuf>,
    /// Classpath entries, dependency output directories and external artifacts.
    pub class_path: IndexSet<PathBuf>,
    /// The root module's own output directory.
    pub output_dir: Option<PathBuf>,
}

impl ModuleClosure {
    fn new(root: &Module) -> Self {
        Self {
            root: root.id(),
            members: Vec::new(),
            sources: IndexSet::new(),
            class_path: IndexSet::new(),
            output_dir: root.output_dir.clone(),
        }
    }

    /// Whether `id` was reached from the root.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m.as_str() == id)
    }
}

/// Computes module closures over a read-only index.
pub struct ClosureAggregator<'a, P: DirectoryCheck = FsCheck> {
    index: &'a ModuleIndex,
    root: &'a Path,
    dir_check: P,
}

impl<'a> ClosureAggregator<'a, FsCheck> {
    /// Creates an aggregator checking the filesystem for directories.
    #[must_use]
    pub fn new(index: &'a ModuleIndex, workspace_root: &'a Path) -> Self {
        Self::with_dir_check(index, workspace_root, FsCheck)
    }
}

impl<'a, P: DirectoryCheck> ClosureAggregator<'a, P> {
    /// Creates an aggregator with a custom directory check.
    #[must_use]
    pub fn with_dir_check(index: &'a ModuleIndex, workspace_root: &'a Path, dir_check: P) -> Self {
        Self {
            index,
            root: workspace_root,
            dir_check,
        }
    }

    /// The index this aggregator reads from.
    #[must_use]
    pub fn index(&self) -> &'a ModuleIndex {
        self.index
    }

    /// The workspace root relative paths are resolved against.
    #[must_use]
    pub fn workspace_root(&self) -> &'a Path {
        self.root
    }

    /// Computes the closure of module `id`.
    ///
    /// Returns `None` when `id` is not in the index.
    #[must_use]
    pub fn closure(&self, id: &str) -> Option<ModuleClosure> {
        let (root_id, root) = self.index.get_entry(id)?;
        let mut closure = ModuleClosure::new(root);
        let mut visited: HashSet<&ModuleId> = HashSet::new();
        let mut stack: Vec<(&ModuleId, &Module)> = vec![(root_id, root)];

        while let Some((current_id, module)) = stack.pop() {
            if !visited.insert(current_id) {
                continue;
            }
            self.contribute(&mut closure, module, current_id != root_id);

            // children are pushed in reverse so they are visited in declaration order
            let children = self.children(module);
            for (child_id, child) in children.into_iter().rev() {
                if !visited.contains(child_id) {
                    stack.push((child_id, child));
                }
            }
        }

        tracing::trace!(
            module = %closure.root,
            members = closure.members.len(),
            sources = closure.sources.len(),
            class_path = closure.class_path.len(),
            "Computed module closure"
        );

        Some(closure)
    }

    fn contribute(&self, closure: &mut ModuleClosure, module: &Module, is_dependency: bool) {
        closure.members.push(module.id());

        for source in &module.source_dirs {
            closure.sources.insert(source.path.clone());
        }

        for entry in &module.class_path {
            closure.class_path.insert(entry.clone());
            if self.dir_check.is_dir(&resolve_path(self.root, entry)) {
                closure.sources.insert(entry.clone());
            }
        }

        if is_dependency && let Some(output) = &module.output_dir {
            closure.class_path.insert(output.clone());
        }

        let external = split_external(module, self.index);
        for artifact in external.artifacts {
            closure.class_path.insert(artifact.to_path_buf());
        }
        for unresolved in external.unresolved {
            tracing::trace!(
                module = %module.id(),
                dependency = %unresolved.id(),
                version = %unresolved.version,
                "Dropping unresolved external dependency"
            );
        }
    }

    /// Modules reachable in one step: module edges first, then aliased
    /// external coordinates.
    fn children(&self, module: &'a Module) -> Vec<(&'a ModuleId, &'a Module)> {
        let mut children = Vec::new();
        for dependency in &module.module_dependencies {
            let id = dependency.id();
            if let Classification::Local(target) = self.index.classify(&id) {
                children.extend(self.entry(target));
            } else {
                tracing::trace!(
                    module = %module.id(),
                    dependency = %id,
                    "Module dependency not found in workspace"
                );
            }
        }
        for alias in split_external(module, self.index).aliases {
            children.extend(self.entry(alias));
        }
        children
    }

    /// Pairs an indexed module with the id key it is stored under.
    fn entry(&self, module: &'a Module) -> Option<(&'a ModuleId, &'a Module)> {
        self.index.get_entry(module.id().as_str())
    }
}
