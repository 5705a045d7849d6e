//! Module records produced by extractors.
//!
//! A [`Module`] describes one buildable unit discovered from a build
//! descriptor. Modules reference each other only by [`ModuleId`], never by
//! embedding one another, so the workspace graph can be held in a flat index.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::path::{Path, PathBuf};

/// Group assigned to modules whose descriptor declares no group.
pub const DEFAULT_GROUP: &str = "default-group";

/// Returns `group`, or [`DEFAULT_GROUP`] when it is empty.
///
/// A module with an empty group and one that explicitly declares
/// `default-group` therefore share the same id.
#[must_use]
pub fn normalize_group(group: &str) -> &str {
    if group.is_empty() { DEFAULT_GROUP } else { group }
}

/// Composite module identifier, `<group>/<artifact>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    /// Builds an id from a group and artifact, normalizing an empty group.
    #[must_use]
    pub fn new(group: &str, artifact: &str) -> Self {
        Self(format!("{}/{artifact}", normalize_group(group)))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ModuleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ModuleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A source directory attributed to the compilation unit that declared it.
///
/// One descriptor may describe several named units (e.g. `main` and `test`
/// source sets), so the owning unit is kept alongside the path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDir {
    /// Name of the owning compilation unit.
    pub unit: String,
    /// Directory holding sources, possibly relative to the workspace root.
    pub path: PathBuf,
}

/// Edge to another module of the same workspace, by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDependency {
    /// Group of the target module.
    pub group: String,
    /// Artifact of the target module.
    pub artifact: String,
    /// Descriptor file that defines the target module, when known.
    ///
    /// Only used to deduplicate descriptors; never part of the identity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_descriptor: Option<PathBuf>,
}

impl ModuleDependency {
    /// Creates an edge to `group/artifact`.
    #[must_use]
    pub fn new(group: &str, artifact: impl Into<String>) -> Self {
        Self {
            group: normalize_group(group).to_string(),
            artifact: artifact.into(),
            source_descriptor: None,
        }
    }

    /// Sets the descriptor that defines the target module.
    #[must_use]
    pub fn with_source_descriptor(mut self, descriptor: impl Into<PathBuf>) -> Self {
        self.source_descriptor = Some(descriptor.into());
        self
    }

    /// Id of the target module.
    #[must_use]
    pub fn id(&self) -> ModuleId {
        ModuleId::new(&self.group, &self.artifact)
    }
}

/// A dependency coordinate not known a priori to live in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalDependency {
    /// Group coordinate.
    pub group: String,
    /// Artifact coordinate.
    pub artifact: String,
    /// Version coordinate.
    pub version: String,
    /// Dependency scope as reported by the build tool.
    pub scope: String,
    /// Artifact file resolved by the extractor, if resolution succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_file: Option<PathBuf>,
}

impl ExternalDependency {
    /// Creates an unresolved external dependency.
    #[must_use]
    pub fn new(
        group: &str,
        artifact: impl Into<String>,
        version: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            group: normalize_group(group).to_string(),
            artifact: artifact.into(),
            version: version.into(),
            scope: scope.into(),
            resolved_file: None,
        }
    }

    /// Sets the resolved artifact file.
    #[must_use]
    pub fn with_resolved_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.resolved_file = Some(file.into());
        self
    }

    /// Id this coordinate would have if it were a workspace module.
    #[must_use]
    pub fn id(&self) -> ModuleId {
        ModuleId::new(&self.group, &self.artifact)
    }
}

/// One buildable unit discovered from a build descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Group coordinate, already normalized.
    pub group: String,
    /// Artifact coordinate.
    pub artifact: String,
    /// Directory the module's configuration is written to.
    ///
    /// An empty path denotes the workspace root.
    #[serde(default)]
    pub project_dir: PathBuf,
    /// Compiled-output directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    /// Source directories in declaration order.
    #[serde(default)]
    pub source_dirs: Vec<SourceDir>,
    /// Already-resolved local classpath entries.
    #[serde(default)]
    pub class_path: IndexSet<PathBuf>,
    /// Edges to other workspace modules.
    #[serde(default)]
    pub module_dependencies: IndexSet<ModuleDependency>,
    /// Dependencies that are not known to be workspace modules.
    #[serde(default)]
    pub external_dependencies: IndexSet<ExternalDependency>,
}

impl Module {
    /// Creates an empty module `group/artifact`.
    #[must_use]
    pub fn new(group: &str, artifact: impl Into<String>) -> Self {
        Self {
            group: normalize_group(group).to_string(),
            artifact: artifact.into(),
            project_dir: PathBuf::new(),
            output_dir: None,
            source_dirs: Vec::new(),
            class_path: IndexSet::new(),
            module_dependencies: IndexSet::new(),
            external_dependencies: IndexSet::new(),
        }
    }

    /// The module's id.
    #[must_use]
    pub fn id(&self) -> ModuleId {
        ModuleId::new(&self.group, &self.artifact)
    }

    /// Sets the project directory.
    #[must_use]
    pub fn with_project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = dir.into();
        self
    }

    /// Sets the compiled-output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Appends a source directory owned by `unit`.
    #[must_use]
    pub fn with_source_dir(mut self, unit: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.source_dirs.push(SourceDir {
            unit: unit.into(),
            path: path.into(),
        });
        self
    }

    /// Adds a classpath entry.
    #[must_use]
    pub fn with_class_path(mut self, entry: impl Into<PathBuf>) -> Self {
        self.class_path.insert(entry.into());
        self
    }

    /// Adds an edge to another workspace module.
    #[must_use]
    pub fn with_module_dependency(mut self, dependency: ModuleDependency) -> Self {
        self.module_dependencies.insert(dependency);
        self
    }

    /// Adds an external dependency.
    #[must_use]
    pub fn with_external_dependency(mut self, dependency: ExternalDependency) -> Self {
        self.external_dependencies.insert(dependency);
        self
    }

    /// Descriptor files referenced by this module's dependency edges.
    pub fn referenced_descriptors(&self) -> impl Iterator<Item = &Path> {
        self.module_dependencies
            .iter()
            .filter_map(|dep| dep.source_descriptor.as_deref())
            .filter(|path| !path.as_os_str().is_empty())
    }
}
