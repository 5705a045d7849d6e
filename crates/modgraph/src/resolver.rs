//! Workspace-wide resolution of module configurations.

use crate::closure::{ClosureAggregator, DirectoryCheck, FsCheck, ModuleClosure};
use crate::config::ResolvedConfiguration;
use crate::graph::ModuleGraph;
use crate::index::ModuleIndex;
use crate::module::ModuleId;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// A module's configuration together with where it belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    /// The module id.
    pub id: ModuleId,
    /// Raw project directory of the module.
    pub project_dir: PathBuf,
    /// The resolved configuration.
    pub configuration: ResolvedConfiguration,
}

/// Resolves configurations for every module of a workspace.
///
/// The index is read-only; each module's closure is independent, so
/// [`resolve_all`](Self::resolve_all) computes them in parallel.
pub struct WorkspaceResolver<'a, P: DirectoryCheck = FsCheck> {
    aggregator: ClosureAggregator<'a, P>,
}

impl<'a> WorkspaceResolver<'a, FsCheck> {
    /// Creates a resolver that checks the filesystem for directories.
    #[must_use]
    pub fn new(index: &'a ModuleIndex, workspace_root: &'a Path) -> Self {
        Self {
            aggregator: ClosureAggregator::new(index, workspace_root),
        }
    }
}

impl<'a, P: DirectoryCheck> WorkspaceResolver<'a, P> {
    /// Creates a resolver with a custom directory check.
    #[must_use]
    pub fn with_dir_check(index: &'a ModuleIndex, workspace_root: &'a Path, dir_check: P) -> Self {
        Self {
            aggregator: ClosureAggregator::with_dir_check(index, workspace_root, dir_check),
        }
    }

    /// Raw closure of module `id`, or `None` if it is unknown.
    #[must_use]
    pub fn closure(&self, id: &str) -> Option<ModuleClosure> {
        self.aggregator.closure(id)
    }

    /// Resolved configuration of module `id`, or `None` if it is unknown.
    #[must_use]
    pub fn configuration(&self, id: &str) -> Option<ResolvedConfiguration> {
        self.closure(id)
            .map(|closure| ResolvedConfiguration::from_closure(self.aggregator.workspace_root(), &closure))
    }

    /// Resolves every module, in index order.
    ///
    /// An empty index yields an empty result.
    #[must_use]
    pub fn resolve_all(&self) -> Vec<ResolvedModule> {
        let index = self.aggregator.index();
        let graph = ModuleGraph::from_index(index);
        graph.log_cycles();

        let modules: Vec<_> = index.modules().collect();
        let resolved: Vec<ResolvedModule> = modules
            .par_iter()
            .filter_map(|module| {
                let id = module.id();
                let configuration = self.configuration(id.as_str())?;
                Some(ResolvedModule {
                    id,
                    project_dir: module.project_dir.clone(),
                    configuration,
                })
            })
            .collect();

        tracing::debug!(modules = resolved.len(), "Resolved workspace modules");
        resolved
    }
}
