//! `pom.xml` reading.
//!
//! Only the parts of the project model that feed module records are read:
//! coordinates, the parent reference, properties, build directories and
//! dependencies. Values are kept verbatim; `${...}` references are expanded
//! later against the whole parent chain.

use crate::error::{Error, Result};
use roxmltree::Node;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Reference to a parent project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentRef {
    /// Parent group id.
    pub group_id: Option<String>,
    /// Parent artifact id.
    pub artifact_id: Option<String>,
    /// Parent version.
    pub version: Option<String>,
    /// Location of the parent descriptor, relative to the child's directory.
    pub relative_path: Option<String>,
}

/// One `<dependency>` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomDependency {
    /// Group id.
    pub group_id: String,
    /// Artifact id.
    pub artifact_id: String,
    /// Version, when declared.
    pub version: Option<String>,
    /// Scope, when declared.
    pub scope: Option<String>,
    /// Packaging type, when declared.
    pub kind: Option<String>,
    /// Classifier, when declared.
    pub classifier: Option<String>,
    /// File of a `system`-scoped dependency.
    pub system_path: Option<String>,
}

/// The subset of a project model read from one `pom.xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pom {
    /// Descriptor this model was read from.
    pub path: PathBuf,
    /// Declared group id.
    pub group_id: Option<String>,
    /// Declared artifact id.
    pub artifact_id: Option<String>,
    /// Declared version.
    pub version: Option<String>,
    /// Parent reference.
    pub parent: Option<ParentRef>,
    /// `<properties>` entries.
    pub properties: BTreeMap<String, String>,
    /// `<build><sourceDirectory>`.
    pub source_directory: Option<String>,
    /// `<build><testSourceDirectory>`.
    pub test_source_directory: Option<String>,
    /// `<build><outputDirectory>`.
    pub output_directory: Option<String>,
    /// `<modules>` entries.
    pub modules: Vec<String>,
    /// `<dependencies>` entries.
    pub dependencies: Vec<PomDependency>,
    /// `<dependencyManagement>` entries.
    pub managed_dependencies: Vec<PomDependency>,
}

impl Pom {
    /// Parses a descriptor's text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Descriptor`] when the text is not XML or its root
    /// element is not `<project>`.
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        let doc = roxmltree::Document::parse(text).map_err(|e| Error::descriptor(path, e.to_string()))?;
        let project = doc.root_element();
        if project.tag_name().name() != "project" {
            return Err(Error::descriptor(
                path,
                format!("root element is <{}>, expected <project>", project.tag_name().name()),
            ));
        }

        let parent = child(project, "parent").map(|parent| ParentRef {
            group_id: text_of(parent, "groupId"),
            artifact_id: text_of(parent, "artifactId"),
            version: text_of(parent, "version"),
            relative_path: text_of(parent, "relativePath"),
        });

        let properties = child(project, "properties")
            .map(|props| {
                props
                    .children()
                    .filter(Node::is_element)
                    .map(|p| (p.tag_name().name().to_string(), p.text().unwrap_or("").trim().to_string()))
                    .collect()
            })
            .unwrap_or_default();

        let build = child(project, "build");
        let modules = child(project, "modules")
            .map(|modules| {
                elements(modules, "module")
                    .filter_map(|m| m.text())
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(ToString::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let managed_dependencies = child(project, "dependencyManagement")
            .map(dependencies_of)
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            group_id: text_of(project, "groupId"),
            artifact_id: text_of(project, "artifactId"),
            version: text_of(project, "version"),
            parent,
            properties,
            source_directory: build.and_then(|b| text_of(b, "sourceDirectory")),
            test_source_directory: build.and_then(|b| text_of(b, "testSourceDirectory")),
            output_directory: build.and_then(|b| text_of(b, "outputDirectory")),
            modules,
            dependencies: dependencies_of(project),
            managed_dependencies,
        })
    }

    /// Reads and parses the descriptor at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not UTF-8, or does
    /// not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| Error::io(e, path, "reading pom.xml"))?;
        let text = String::from_utf8(bytes).map_err(|_| Error::descriptor(path, "not valid UTF-8"))?;
        Self::parse(&text, path)
    }

    /// Directory containing the descriptor.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Group id, inherited from the parent reference when undeclared.
    #[must_use]
    pub fn group(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or_else(|| self.parent.as_ref().and_then(|p| p.group_id.as_deref()))
    }

    /// Version, inherited from the parent reference when undeclared.
    #[must_use]
    pub fn project_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or_else(|| self.parent.as_ref().and_then(|p| p.version.as_deref()))
    }

    /// Location of the parent descriptor on disk, if it exists.
    #[must_use]
    pub fn parent_descriptor(&self) -> Option<PathBuf> {
        let parent = self.parent.as_ref()?;
        let relative = parent.relative_path.as_deref().unwrap_or("../pom.xml");
        if relative.is_empty() {
            return None;
        }
        let mut candidate = jlsprep_modgraph::resolve_path(self.dir(), Path::new(relative));
        if candidate.is_dir() {
            candidate.push("pom.xml");
        }
        candidate.is_file().then_some(candidate)
    }
}

/// Maximum nesting of property references expanded.
const MAX_INTERPOLATION_DEPTH: usize = 8;

/// Expands `${name}` references in `value` using `lookup`.
///
/// Unknown references are left as written. Values that themselves contain
/// references are expanded up to a fixed depth.
pub fn interpolate(value: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    let mut current = value.to_string();
    for _ in 0..MAX_INTERPOLATION_DEPTH {
        if !current.contains("${") {
            break;
        }
        let next = interpolate_once(&current, lookup);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn interpolate_once(value: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        match lookup(after[..end].trim()) {
            Some(expanded) => out.push_str(&expanded),
            None => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    out
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    elements(node, name).next()
}

fn elements<'a, 'input>(node: Node<'a, 'input>, name: &str) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |c| c.is_element() && c.tag_name().name() == name)
}

fn text_of(node: Node<'_, '_>, name: &str) -> Option<String> {
    child(node, name)
        .and_then(|c| c.text())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(ToString::to_string)
}

fn dependencies_of(node: Node<'_, '_>) -> Vec<PomDependency> {
    let Some(dependencies) = child(node, "dependencies") else {
        return Vec::new();
    };
    elements(dependencies, "dependency")
        .filter_map(|dep| {
            let (Some(group_id), Some(artifact_id)) = (text_of(dep, "groupId"), text_of(dep, "artifactId")) else {
                tracing::trace!("Skipping dependency without coordinates");
                return None;
            };
            Some(PomDependency {
                group_id,
                artifact_id,
                version: text_of(dep, "version"),
                scope: text_of(dep, "scope"),
                kind: text_of(dep, "type"),
                classifier: text_of(dep, "classifier"),
                system_path: text_of(dep, "systemPath"),
            })
        })
        .collect()
}
