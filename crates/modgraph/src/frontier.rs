//! Descriptor deduplication frontier.
//!
//! Hierarchical build tools usually report every sub-project of a tree in a
//! single invocation on the root descriptor. The frontier remembers which
//! descriptor files have already been accounted for, so a sub-descriptor
//! found again by a filesystem scan is not extracted a second time.

use crate::module::Module;
use crate::paths::resolve_path;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Set of absolute, normalized descriptor paths already accounted for.
#[derive(Debug, Clone)]
pub struct DescriptorFrontier {
    root: PathBuf,
    seen: HashSet<PathBuf>,
}

impl DescriptorFrontier {
    /// Creates an empty frontier for the workspace at `root`.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            root: resolve_path(root, Path::new("")),
            seen: HashSet::new(),
        }
    }

    /// Whether `descriptor` has already been accounted for.
    #[must_use]
    pub fn contains(&self, descriptor: &Path) -> bool {
        self.seen.contains(&resolve_path(&self.root, descriptor))
    }

    /// Claims `descriptor` for extraction.
    ///
    /// Returns `false` (and claims nothing) when it was already accounted for.
    pub fn claim(&mut self, descriptor: &Path) -> bool {
        self.seen.insert(resolve_path(&self.root, descriptor))
    }

    /// Records the outcome of extracting a descriptor.
    ///
    /// Every descriptor referenced by the modules' dependency edges is
    /// marked as accounted for.
    pub fn record_extraction<'a, I>(&mut self, descriptor: &Path, modules: I)
    where
        I: IntoIterator<Item = &'a Module>,
    {
        self.claim(descriptor);
        for module in modules {
            for referenced in module.referenced_descriptors() {
                let path = resolve_path(&self.root, referenced);
                if self.seen.insert(path) {
                    tracing::trace!(
                        descriptor = %referenced.display(),
                        module = %module.id(),
                        "Descriptor accounted for by dependency edge"
                    );
                }
            }
        }
    }

    /// Number of descriptors accounted for.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been accounted for yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
