//! End-to-end tests of the `jlsprep` binary.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Binary with the user configuration directory pointed at `home`.
fn jlsprep(home: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("jlsprep").unwrap();
    cmd.env("XDG_CONFIG_HOME", home)
        .env_remove("JLSPREP_WORKSPACE")
        .env_remove("JLSPREP_GRADLE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_version_command() {
    let temp = TempDir::new().unwrap();
    jlsprep(temp.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!("jlsprep {}", env!("CARGO_PKG_VERSION"))));
}

#[test]
fn test_prepare_writes_config_for_source_tree() {
    let temp = TempDir::new().unwrap();
    let ws = temp.path().join("ws");
    fs::create_dir_all(ws.join("src/main/java")).unwrap();

    jlsprep(temp.path())
        .args(["prepare", "--workspace"])
        .arg(&ws)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created:"))
        .stdout(predicate::str::contains("sources extractor"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(ws.join(".jls-config")).unwrap()).unwrap();
    assert_eq!(
        written["sources"],
        serde_json::json!([ws.join("src/main/java").display().to_string()])
    );
    assert_eq!(written["classPath"], serde_json::json!([]));
    assert!(written.get("outputDirectory").is_none());
}

#[test]
fn test_prepare_maven_project() {
    let temp = TempDir::new().unwrap();
    let ws = temp.path().join("ws");
    fs::create_dir_all(ws.join("src/main/java")).unwrap();
    fs::write(
        ws.join("pom.xml"),
        "<project><groupId>org.example</groupId><artifactId>demo</artifactId><version>1</version></project>",
    )
    .unwrap();

    jlsprep(temp.path())
        .args(["prepare", "--workspace"])
        .arg(&ws)
        .assert()
        .success()
        .stdout(predicate::str::contains("maven extractor"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(ws.join(".jls-config")).unwrap()).unwrap();
    assert_eq!(
        written["outputDirectory"],
        serde_json::json!(ws.join("target/classes").display().to_string())
    );
}

#[test]
fn test_second_run_is_unchanged() {
    let temp = TempDir::new().unwrap();
    let ws = temp.path().join("ws");
    fs::create_dir_all(ws.join("java")).unwrap();

    jlsprep(temp.path()).arg("prepare").current_dir(&ws).assert().success();
    jlsprep(temp.path())
        .arg("prepare")
        .current_dir(&ws)
        .assert()
        .success()
        .stdout(predicate::str::contains("Unchanged:"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let ws = temp.path().join("ws");
    fs::create_dir_all(ws.join("java")).unwrap();

    jlsprep(temp.path())
        .args(["prepare", "--dry-run", "--workspace"])
        .arg(&ws)
        .assert()
        .success()
        .stdout(predicate::str::contains("Would create:"));
    assert!(!ws.join(".jls-config").exists());
}

#[test]
fn test_workspace_from_environment_and_json_output() {
    let temp = TempDir::new().unwrap();
    let ws = temp.path().join("ws");
    fs::create_dir_all(ws.join("java")).unwrap();

    let output = jlsprep(temp.path())
        .env("JLSPREP_WORKSPACE", &ws)
        .args(["--json", "prepare"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "ok");
    assert_eq!(value["data"]["extractor"], "sources");
    assert_eq!(value["data"]["files"][0]["status"], "Created");
}

#[test]
fn test_missing_workspace_fails() {
    let temp = TempDir::new().unwrap();
    jlsprep(temp.path())
        .args(["--json", "prepare", "--workspace"])
        .arg(temp.path().join("absent"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"code\":\"config\""))
        .stdout(predicate::str::contains("not a directory"));
}

#[test]
fn test_invalid_settings_file_fails() {
    let temp = TempDir::new().unwrap();
    let ws = temp.path().join("ws");
    fs::create_dir_all(&ws).unwrap();
    fs::write(ws.join("jlsprep.toml"), "skip_dirs = 3\n").unwrap();

    jlsprep(temp.path())
        .args(["--json", "prepare", "--workspace"])
        .arg(&ws)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"code\":\"config\""));
}

#[cfg(unix)]
#[test]
fn test_gradle_flag_selects_command() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    let ws = temp.path().join("ws");
    fs::create_dir_all(ws.join("src")).unwrap();
    fs::write(ws.join("build.gradle"), "").unwrap();

    let gradle = temp.path().join("fake-gradle");
    fs::write(
        &gradle,
        format!(
            "#!/bin/sh\necho \"SRCLIB-ARTIFACT demo\"\necho \"SRCLIB-GROUP org.example\"\necho \"SRCLIB-PROJECTDIR {}\"\necho \"SRCLIB-SOURCEDIR org.example:main:src\"\n",
            ws.display()
        ),
    )
    .unwrap();
    let mut permissions = fs::metadata(&gradle).unwrap().permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&gradle, permissions).unwrap();

    jlsprep(temp.path())
        .args(["prepare", "--workspace"])
        .arg(&ws)
        .arg("--gradle")
        .arg(&gradle)
        .assert()
        .success()
        .stdout(predicate::str::contains("gradle extractor"));
    assert!(ws.join(".jls-config").is_file());
}
