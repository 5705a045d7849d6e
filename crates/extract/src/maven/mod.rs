//! Maven extraction.
//!
//! Every `pom.xml` in the workspace describes one module. Descriptors are
//! read directly, without running Maven. Parent descriptors found on disk
//! contribute properties, build directories, inherited dependencies and
//! managed versions. Dependency jars are taken from the local repository
//! when they are already there; nothing is downloaded.

mod pom;

pub use pom::{ParentRef, Pom, PomDependency, interpolate};

use crate::context::ExtractionContext;
use crate::error::{Error, Result};
use crate::extractor::{Extraction, Extractor};
use crate::scan;
use jlsprep_modgraph::{DEFAULT_GROUP, ExternalDependency, Module, resolve_path};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Descriptor file name looked for in every directory.
pub const POM_FILE: &str = "pom.xml";

/// Main source directory when `<sourceDirectory>` is not set.
pub const DEFAULT_SOURCE_DIR: &str = "src/main/java";

/// Test source directory when `<testSourceDirectory>` is not set.
pub const DEFAULT_TEST_SOURCE_DIR: &str = "src/test/java";

/// Compiled-output directory when `<outputDirectory>` is not set.
pub const DEFAULT_OUTPUT_DIR: &str = "target/classes";

/// Scope of dependencies that do not declare one.
pub const DEFAULT_SCOPE: &str = "compile";

/// Longest parent chain followed.
const MAX_PARENT_DEPTH: usize = 16;

/// Extracts modules by reading `pom.xml` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct MavenExtractor;

impl Extractor for MavenExtractor {
    fn name(&self) -> &'static str {
        "maven"
    }

    fn descriptors(&self, ctx: &ExtractionContext) -> Result<Vec<PathBuf>> {
        scan::find_files(ctx.root(), POM_FILE, ctx.settings())
    }

    fn extract(&self, ctx: &ExtractionContext, descriptor: &Path) -> Result<Extraction> {
        let lineage = Lineage::load(descriptor)?;
        let repository = ctx.settings().maven_repository();
        let mut warnings = Vec::new();
        let module = lineage.module(repository.as_deref(), &mut warnings)?;
        Ok(Extraction {
            modules: vec![module],
            warnings,
        })
    }
}

/// A project followed by the parents found on disk, nearest first.
#[derive(Debug, Clone)]
struct Lineage {
    poms: Vec<Pom>,
}

impl Lineage {
    fn load(descriptor: &Path) -> Result<Self> {
        let project = Pom::load(descriptor)?;
        let mut visited = HashSet::from([project.path.clone()]);
        let mut poms = vec![project];

        while poms.len() < MAX_PARENT_DEPTH {
            let Some(current) = poms.last() else { break };
            let Some(parent_path) = current.parent_descriptor() else { break };
            if !visited.insert(parent_path.clone()) {
                break;
            }
            let parent = match Pom::load(&parent_path) {
                Ok(parent) => parent,
                Err(e) => {
                    tracing::debug!(parent = %parent_path.display(), error = %e, "Parent descriptor unusable");
                    break;
                }
            };
            if !is_referenced_parent(current, &parent) {
                tracing::debug!(
                    parent = %parent_path.display(),
                    child = %current.path.display(),
                    "Descriptor at parent location is a different project"
                );
                break;
            }
            poms.push(parent);
        }
        Ok(Self { poms })
    }

    fn project(&self) -> &Pom {
        &self.poms[0]
    }

    /// Resolves `${name}` for the project.
    fn property(&self, name: &str) -> Option<String> {
        let project = self.project();
        let name = name
            .strip_prefix("project.")
            .or_else(|| name.strip_prefix("pom."))
            .unwrap_or(name);
        match name {
            "groupId" => return project.group().map(ToString::to_string),
            "artifactId" => return project.artifact_id.clone(),
            "version" => return project.project_version().map(ToString::to_string),
            "basedir" => return Some(project.dir().display().to_string()),
            "parent.groupId" => return project.parent.as_ref().and_then(|p| p.group_id.clone()),
            "parent.version" => return project.parent.as_ref().and_then(|p| p.version.clone()),
            _ => {}
        }
        if let Some(var) = name.strip_prefix("env.") {
            return std::env::var(var).ok();
        }
        self.poms.iter().find_map(|pom| pom.properties.get(name).cloned())
    }

    fn expand(&self, value: &str) -> String {
        interpolate(value, &|name: &str| self.property(name))
    }

    /// First value of a build setting along the chain.
    fn build_setting(&self, select: impl Fn(&Pom) -> Option<&String>) -> Option<String> {
        self.poms.iter().find_map(select).map(|v| self.expand(v))
    }

    fn managed_version(&self, group: &str, artifact: &str) -> Option<String> {
        self.poms
            .iter()
            .flat_map(|pom| &pom.managed_dependencies)
            .find(|managed| self.expand(&managed.group_id) == group && self.expand(&managed.artifact_id) == artifact)
            .and_then(|managed| managed.version.as_deref())
            .map(|version| self.expand(version))
    }

    fn module(&self, repository: Option<&Path>, warnings: &mut Vec<String>) -> Result<Module> {
        let project = self.project();
        let Some(artifact) = project.artifact_id.as_deref().map(|a| self.expand(a)) else {
            return Err(Error::descriptor(&project.path, "missing <artifactId>"));
        };
        let group = project.group().map_or_else(|| DEFAULT_GROUP.to_string(), |g| self.expand(g));
        let dir = project.dir();

        let mut module = Module::new(&group, artifact).with_project_dir(dir);
        let unit = module.id().to_string();

        let main = self
            .build_setting(|pom| pom.source_directory.as_ref())
            .unwrap_or_else(|| DEFAULT_SOURCE_DIR.to_string());
        let test = self
            .build_setting(|pom| pom.test_source_directory.as_ref())
            .unwrap_or_else(|| DEFAULT_TEST_SOURCE_DIR.to_string());
        for (suffix, source) in [("main", main), ("test", test)] {
            let path = resolve_path(dir, Path::new(&source));
            if path.is_dir() {
                let owner = format!("{}/{suffix}", module.group);
                module = module.with_source_dir(owner, path);
            } else {
                tracing::trace!(module = %unit, path = %path.display(), "Source directory absent");
            }
        }

        let output = self
            .build_setting(|pom| pom.output_directory.as_ref())
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string());
        module = module.with_output_dir(resolve_path(dir, Path::new(&output)));

        for dependency in self.dependencies(repository, warnings, &unit) {
            module = module.with_external_dependency(dependency);
        }
        Ok(module)
    }

    /// Declared and inherited dependencies; the nearest declaration of a
    /// coordinate wins.
    fn dependencies(
        &self,
        repository: Option<&Path>,
        warnings: &mut Vec<String>,
        unit: &str,
    ) -> Vec<ExternalDependency> {
        let mut seen = HashSet::new();
        let mut resolved = Vec::new();
        for declared in self.poms.iter().flat_map(|pom| &pom.dependencies) {
            let group = self.expand(&declared.group_id);
            let artifact = self.expand(&declared.artifact_id);
            if !seen.insert((group.clone(), artifact.clone())) {
                continue;
            }

            let scope = declared
                .scope
                .as_deref()
                .map_or_else(|| DEFAULT_SCOPE.to_string(), |s| self.expand(s));
            let version = declared
                .version
                .as_deref()
                .map(|v| self.expand(v))
                .or_else(|| self.managed_version(&group, &artifact));
            let Some(version) = version else {
                warnings.push(format!("{unit}: dependency {group}:{artifact} has no version"));
                resolved.push(ExternalDependency::new(&group, artifact, "", scope));
                continue;
            };

            let file = if scope == "system" {
                declared
                    .system_path
                    .as_deref()
                    .map(|p| PathBuf::from(self.expand(p)))
            } else {
                repository.and_then(|repo| {
                    let kind = declared.kind.as_deref().map(|k| self.expand(k));
                    let classifier = declared.classifier.as_deref().map(|c| self.expand(c));
                    local_artifact(repo, &group, &artifact, &version, kind.as_deref(), classifier.as_deref())
                })
            };

            let mut dependency = ExternalDependency::new(&group, artifact, version, scope);
            match file {
                Some(file) if file.is_file() => dependency = dependency.with_resolved_file(file),
                Some(file) => tracing::debug!(
                    module = %unit,
                    dependency = %dependency.id(),
                    file = %file.display(),
                    "Artifact not in local repository"
                ),
                None => {}
            }
            resolved.push(dependency);
        }
        resolved
    }
}

/// Whether `parent` is the project `child` names as its parent.
fn is_referenced_parent(child: &Pom, parent: &Pom) -> bool {
    let Some(reference) = child.parent.as_ref() else {
        return false;
    };
    let artifact_matches = reference.artifact_id.is_none() || reference.artifact_id == parent.artifact_id;
    let group_matches = match (reference.group_id.as_deref(), parent.group()) {
        (Some(wanted), Some(found)) => wanted == found,
        _ => true,
    };
    artifact_matches && group_matches
}

/// Location of a jar inside a local repository.
///
/// Returns `None` for packaging types that do not produce a jar.
#[must_use]
pub fn local_artifact(
    repository: &Path,
    group: &str,
    artifact: &str,
    version: &str,
    kind: Option<&str>,
    classifier: Option<&str>,
) -> Option<PathBuf> {
    let classifier = match (kind.unwrap_or("jar"), classifier) {
        ("test-jar", None) => Some("tests"),
        ("jar" | "test-jar" | "bundle" | "ejb" | "maven-plugin", classifier) => classifier,
        _ => return None,
    };
    let file_name = match classifier {
        Some(classifier) => format!("{artifact}-{version}-{classifier}.jar"),
        None => format!("{artifact}-{version}.jar"),
    };
    let mut path = repository.to_path_buf();
    path.extend(group.split('.'));
    path.push(artifact);
    path.push(version);
    path.push(file_name);
    Some(path)
}
