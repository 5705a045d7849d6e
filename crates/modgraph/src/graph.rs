//! Module dependency graph built with petgraph.
//!
//! This is a diagnostic view over a [`ModuleIndex`]. Closure computation
//! never consults it; it only reports structure such as dependency cycles.

use crate::alias::split_external;
use crate::index::{Classification, ModuleIndex};
use crate::module::ModuleId;
use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;
use tracing::debug;

/// Directed graph of intra-workspace module edges.
///
/// Both explicit module dependencies and aliased external coordinates
/// become edges, since the resolver follows both.
pub struct ModuleGraph {
    graph: DiGraph<ModuleId, ()>,
    id_to_node: HashMap<ModuleId, NodeIndex>,
}

impl ModuleGraph {
    /// Builds the graph for every module in `index`.
    #[must_use]
    pub fn from_index(index: &ModuleIndex) -> Self {
        let mut graph = DiGraph::new();
        let mut id_to_node = HashMap::new();

        for id in index.ids() {
            let node = graph.add_node(id.clone());
            id_to_node.insert(id.clone(), node);
        }

        for module in index.modules() {
            let Some(&from) = id_to_node.get(&module.id()) else {
                continue;
            };
            let local = module
                .module_dependencies
                .iter()
                .filter_map(|dependency| match index.classify(&dependency.id()) {
                    Classification::Local(target) => Some(target),
                    Classification::External => None,
                })
                .chain(split_external(module, index).aliases);
            for target in local {
                if let Some(&to) = id_to_node.get(&target.id()) {
                    graph.update_edge(from, to, ());
                }
            }
        }

        debug!(
            modules = graph.node_count(),
            edges = graph.edge_count(),
            "Built module graph"
        );

        Self { graph, id_to_node }
    }

    /// Number of modules in the graph.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct dependency edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether `from` directly depends on `to`.
    #[must_use]
    pub fn depends_on(&self, from: &str, to: &str) -> bool {
        match (self.id_to_node.get(from), self.id_to_node.get(to)) {
            (Some(&a), Some(&b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }

    /// Check if the graph has cycles.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Groups of modules that depend on each other, including modules that
    /// depend on themselves.
    ///
    /// Each cycle lists its members sorted by id; cycles are sorted by their
    /// first member.
    #[must_use]
    pub fn cycles(&self) -> Vec<Vec<ModuleId>> {
        let mut cycles: Vec<Vec<ModuleId>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&node| self.graph.contains_edge(node, node))
            })
            .map(|component| {
                let mut ids: Vec<ModuleId> = component.into_iter().map(|node| self.graph[node].clone()).collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Logs every dependency cycle at debug level.
    pub fn log_cycles(&self) {
        for cycle in self.cycles() {
            let members: Vec<&str> = cycle.iter().map(ModuleId::as_str).collect();
            debug!(modules = ?members, "Dependency cycle between workspace modules");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::{ExternalDependency, Module, ModuleDependency};

    #[test]
    fn test_edges_from_modules_and_aliases() {
        let index = ModuleIndex::from_modules([
            Module::new("g", "a").with_module_dependency(ModuleDependency::new("g", "b")),
            Module::new("g", "b").with_external_dependency(ExternalDependency::new("g", "c", "1", "compile")),
            Module::new("g", "c").with_module_dependency(ModuleDependency::new("org", "outside")),
        ]);
        let graph = ModuleGraph::from_index(&index);

        assert_eq!(graph.module_count(), 3);
        assert_eq!(graph.edge_count(), 2);
        assert!(graph.depends_on("g/a", "g/b"));
        assert!(graph.depends_on("g/b", "g/c"));
        assert!(!graph.depends_on("g/c", "org/outside"));
        assert!(!graph.has_cycles());
        assert!(graph.cycles().is_empty());
    }

    #[test]
    fn test_cycle_reported() {
        let index = ModuleIndex::from_modules([
            Module::new("g", "b").with_module_dependency(ModuleDependency::new("g", "a")),
            Module::new("g", "a").with_module_dependency(ModuleDependency::new("g", "b")),
            Module::new("g", "c"),
        ]);
        let graph = ModuleGraph::from_index(&index);

        assert!(graph.has_cycles());
        assert_eq!(
            graph.cycles(),
            vec![vec![ModuleId::new("g", "a"), ModuleId::new("g", "b")]]
        );
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let index = ModuleIndex::from_modules([
            Module::new("g", "a").with_module_dependency(ModuleDependency::new("g", "a"))
        ]);
        let graph = ModuleGraph::from_index(&index);

        assert_eq!(graph.cycles(), vec![vec![ModuleId::new("g", "a")]]);
    }

    #[test]
    fn test_empty_graph() {
        let graph = ModuleGraph::from_index(&ModuleIndex::new());
        assert_eq!(graph.module_count(), 0);
        assert!(graph.cycles().is_empty());
    }
}
