//! Reconciliation of external coordinates that alias workspace modules.
//!
//! Some descriptors declare a sibling project as a plain external artifact
//! instead of a project dependency. When such a coordinate matches a module
//! id of the current run, it is followed exactly like a module edge to that
//! id. The consumer's own id is never re-entered: it is already visited when
//! its external dependencies are examined.

use crate::index::{Classification, ModuleIndex};
use crate::module::{ExternalDependency, Module};
use std::path::Path;

/// External dependencies of `module`, split by classification.
#[derive(Debug, Default)]
pub struct ExternalSplit<'a> {
    /// Workspace modules named by external coordinates.
    pub aliases: Vec<&'a Module>,
    /// Resolved files of genuinely external dependencies.
    pub artifacts: Vec<&'a Path>,
    /// Genuinely external dependencies the extractor could not resolve.
    pub unresolved: Vec<&'a ExternalDependency>,
}

/// Splits `module`'s external dependencies into workspace aliases and
/// external artifact files.
#[must_use]
pub fn split_external<'a>(module: &'a Module, index: &'a ModuleIndex) -> ExternalSplit<'a> {
    let mut split = ExternalSplit::default();
    for dependency in &module.external_dependencies {
        match index.classify(&dependency.id()) {
            Classification::Local(target) => {
                tracing::trace!(
                    module = %module.id(),
                    alias = %target.id(),
                    "External coordinate resolves to workspace module"
                );
                split.aliases.push(target);
            }
            Classification::External => match dependency.resolved_file.as_deref() {
                Some(file) if !file.as_os_str().is_empty() => split.artifacts.push(file),
                _ => split.unresolved.push(dependency),
            },
        }
    }
    split
}
