//! End-to-end resolution against a real directory tree.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use jlsprep_modgraph::{
    CONFIG_FILE_NAME, ConfigWriter, DescriptorFrontier, ExternalDependency, FileStatus, Module, ModuleDependency,
    ModuleIndex, ResolvedConfiguration, WorkspaceResolver,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn s(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn workspace() -> TempDir {
    let temp = TempDir::new().unwrap();
    for dir in ["a/src", "b/src", "b/build"] {
        fs::create_dir_all(temp.path().join(dir)).unwrap();
    }
    temp
}

#[test]
fn test_dependency_build_dir_becomes_source_and_class_path() {
    let temp = workspace();
    let root = temp.path();
    let index = ModuleIndex::from_modules([
        Module::new("g", "a")
            .with_project_dir("a")
            .with_source_dir("g/main", "a/src")
            .with_module_dependency(ModuleDependency::new("g", "b")),
        Module::new("g", "b")
            .with_project_dir("b")
            .with_source_dir("g/main", "b/src")
            .with_class_path("b/build"),
    ]);

    let resolver = WorkspaceResolver::new(&index, root);
    let config = resolver.configuration("g/a").unwrap();

    assert_eq!(
        config.sources,
        vec![s(&root.join("a/src")), s(&root.join("b/src")), s(&root.join("b/build"))]
    );
    assert_eq!(config.class_path, vec![s(&root.join("b/build"))]);
}

#[test]
fn test_missing_class_path_directory_is_not_a_source() {
    let temp = workspace();
    let root = temp.path();
    let index = ModuleIndex::from_modules([Module::new("g", "b").with_class_path("b/classes")]);

    let config = WorkspaceResolver::new(&index, root).configuration("g/b").unwrap();
    assert!(config.sources.is_empty());
    assert_eq!(config.class_path, vec![s(&root.join("b/classes"))]);
}

#[test]
fn test_resolve_and_emit_every_module() {
    let temp = workspace();
    let root = temp.path();
    let index = ModuleIndex::from_modules([
        Module::new("g", "a")
            .with_project_dir("a")
            .with_output_dir("a/out")
            .with_source_dir("g/main", "a/src")
            .with_external_dependency(
                ExternalDependency::new("junit", "junit", "4.12", "test").with_resolved_file("/m2/junit.jar"),
            )
            .with_external_dependency(ExternalDependency::new("g", "b", "1.0", "compile")),
        Module::new("g", "b").with_project_dir("b").with_source_dir("g/main", "b/src"),
    ]);

    let resolved = WorkspaceResolver::new(&index, root).resolve_all();
    let writer = ConfigWriter::new(root);
    let results = writer.emit_all(&resolved);

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| matches!(r.outcome, Ok(FileStatus::Created))));

    let written: ResolvedConfiguration =
        serde_json::from_str(&fs::read_to_string(root.join("a").join(CONFIG_FILE_NAME)).unwrap()).unwrap();
    assert_eq!(written.sources, vec![s(&root.join("a/src")), s(&root.join("b/src"))]);
    assert_eq!(written.class_path, vec!["/m2/junit.jar".to_string()]);
    assert_eq!(written.output_directory, Some(s(&root.join("a/out"))));

    // a second run over the same input changes nothing
    let again = writer.emit_all(&WorkspaceResolver::new(&index, root).resolve_all());
    assert!(again.iter().all(|r| matches!(r.outcome, Ok(FileStatus::Unchanged))));
}

#[test]
fn test_frontier_skips_child_descriptor_reported_by_root() {
    let temp = workspace();
    let root = temp.path();
    let mut frontier = DescriptorFrontier::new(root);

    let root_descriptor = root.join("build.gradle");
    let extracted = [
        Module::new("g", "root").with_module_dependency(
            ModuleDependency::new("g", "a").with_source_descriptor(root.join("a/build.gradle")),
        ),
        Module::new("g", "a"),
    ];

    assert!(frontier.claim(&root_descriptor));
    frontier.record_extraction(&root_descriptor, &extracted);

    assert!(frontier.contains(&root.join("a/build.gradle")));
    assert!(!frontier.claim(Path::new("a/build.gradle")));
    assert!(frontier.claim(Path::new("b/build.gradle")));
}
