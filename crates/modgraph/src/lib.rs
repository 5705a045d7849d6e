//! Workspace module graph resolution for jlsprep.
//!
//! Build-system extractors turn descriptors into flat lists of [`Module`]
//! records. This crate turns those records into one [`ResolvedConfiguration`]
//! per module: the closed set of source directories and classpath entries
//! reachable through intra-workspace dependencies.
//!
//! # Architecture
//!
//! - [`DescriptorFrontier`] - remembers descriptors already accounted for so
//!   nested descriptors are extracted once
//! - [`ModuleIndex`] - flat `id → Module` map; classifies dependency
//!   coordinates as local or external
//! - [`ClosureAggregator`] - depth-first closure with a visited set per root,
//!   following module edges and external coordinates that alias a module
//! - [`WorkspaceResolver`] - resolves every module in parallel
//! - [`ConfigWriter`] - writes `.jls-config` next to each module
//!
//! Resolution never fails: an empty module list resolves to no
//! configurations, unresolved externals are dropped and cycles terminate.
//!
//! # Example
//!
//! ```
//! use jlsprep_modgraph::{Module, ModuleDependency, ModuleIndex, WorkspaceResolver};
//! use std::path::Path;
//!
//! let index = ModuleIndex::from_modules([
//!     Module::new("g", "a")
//!         .with_source_dir("g/main", "a/src")
//!         .with_module_dependency(ModuleDependency::new("g", "b")),
//!     Module::new("g", "b").with_source_dir("g/main", "b/src"),
//! ]);
//!
//! let resolver = WorkspaceResolver::with_dir_check(&index, Path::new("/ws"), |_: &Path| false);
//! let config = resolver.configuration("g/a").unwrap();
//! assert_eq!(config.sources, vec!["/ws/a/src", "/ws/b/src"]);
//! ```

pub mod alias;
pub mod closure;
pub mod config;
pub mod emit;
pub mod error;
pub mod frontier;
pub mod graph;
pub mod index;
pub mod module;
pub mod paths;
pub mod resolver;

pub use closure::{ClosureAggregator, DirectoryCheck, FsCheck, ModuleClosure};
pub use config::ResolvedConfiguration;
pub use emit::{CONFIG_FILE_NAME, ConfigWriter, EmitResult, FileStatus};
pub use error::{Error, Result};
pub use frontier::DescriptorFrontier;
pub use graph::ModuleGraph;
pub use index::{Classification, ModuleIndex};
pub use module::{DEFAULT_GROUP, ExternalDependency, Module, ModuleDependency, ModuleId, SourceDir, normalize_group};
pub use paths::{resolve_path, resolve_path_string};
pub use resolver::{ResolvedModule, WorkspaceResolver};
