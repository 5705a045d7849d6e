//! Flat module index and local/external dependency classification.

use crate::module::{Module, ModuleId};
use indexmap::IndexMap;

/// How a dependency coordinate resolves against the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    /// The coordinate names a module of this workspace.
    Local(&'a Module),
    /// The coordinate is an external artifact.
    External,
}

impl Classification<'_> {
    /// Whether the coordinate names a workspace module.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

/// Id → module index built once per run.
///
/// A later module with an id already present replaces the earlier entry
/// but keeps its position, so iteration order stays the order in which ids
/// were first seen.
#[derive(Debug, Clone, Default)]
pub struct ModuleIndex {
    modules: IndexMap<ModuleId, Module>,
}

impl ModuleIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index from extracted modules (last write wins).
    #[must_use]
    pub fn from_modules<I: IntoIterator<Item = Module>>(modules: I) -> Self {
        let mut index = Self::new();
        for module in modules {
            index.insert(module);
        }
        index
    }

    /// Inserts a module, returning the one it replaced, if any.
    pub fn insert(&mut self, module: Module) -> Option<Module> {
        let id = module.id();
        let replaced = self.modules.insert(id.clone(), module);
        if replaced.is_some() {
            tracing::debug!(module = %id, "Duplicate module id, later record wins");
        }
        replaced
    }

    /// Looks a module up by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Module> {
        self.modules.get(id)
    }

    /// Looks a module up by id, returning the stored key alongside it.
    #[must_use]
    pub fn get_entry(&self, id: &str) -> Option<(&ModuleId, &Module)> {
        self.modules.get_key_value(id)
    }

    /// Whether a module with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.modules.contains_key(id)
    }

    /// Classifies a dependency coordinate by its id.
    #[must_use]
    pub fn classify(&self, id: &ModuleId) -> Classification<'_> {
        self.get(id.as_str())
            .map_or(Classification::External, Classification::Local)
    }

    /// Module ids in first-seen order.
    pub fn ids(&self) -> impl Iterator<Item = &ModuleId> {
        self.modules.keys()
    }

    /// Modules in first-seen order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    /// Number of indexed modules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl FromIterator<Module> for ModuleIndex {
    fn from_iter<I: IntoIterator<Item = Module>>(iter: I) -> Self {
        Self::from_modules(iter)
    }
}
