//! Integration tests for the remaining commands and global flags.

use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn distfix() -> Command {
    Command::new(env!("CARGO_BIN_EXE_distfix"))
}

#[test]
fn test_version() {
    let output = distfix().arg("version").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("distfix "));
}

#[test]
fn test_version_json() {
    let output = distfix().args(["version", "--json"]).output().unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["name"], "distfix");
    assert_eq!(json["schema_version"], 1);
    assert!(json["version"].as_str().is_some_and(|v| !v.is_empty()));
}

#[test]
fn test_watch_and_json_conflict() {
    let dir = tempdir().unwrap();

    let output = distfix()
        .args(["transform", "--watch", "--json", "--cwd"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot be combined"));
}

#[test]
fn test_clean_removes_output_dir() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("dist/nested")).unwrap();
    fs::write(dir.path().join("dist/nested/a.js"), "").unwrap();

    let output = distfix()
        .args(["clean", "--json", "--cwd"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["ok"], true);
    assert_eq!(json["removed"], true);
    assert!(!dir.path().join("dist").exists());
}

#[test]
fn test_clean_without_output_dir() {
    let dir = tempdir().unwrap();

    let output = distfix()
        .args(["clean", "--json", "--cwd"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["removed"], false);
}

#[test]
fn test_compile_without_typescript_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("package.json"), r#"{"main": "dist/index.js"}"#).unwrap();

    let output = distfix()
        .args(["compile", "--cwd"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("TypeScript not found"));
}

#[test]
fn test_declare_without_typescript_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("package.json"), r#"{"main": "dist/index.js"}"#).unwrap();

    let output = distfix()
        .args(["declare", "--cwd"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("TypeScript not found"));
}

#[test]
fn test_prepare_without_typescript_keeps_output() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("package.json"), r#"{"main": "dist/index.js"}"#).unwrap();
    fs::create_dir(dir.path().join("dist")).unwrap();
    fs::write(dir.path().join("dist/index.js"), "").unwrap();

    let output = distfix()
        .args(["prepare", "--cwd"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("TypeScript not found"));
    assert!(dir.path().join("dist/index.js").exists());
}

#[test]
fn test_human_transform_prints_warnings_to_stderr() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{"main": "dist/index.js"}"#,
    )
    .unwrap();
    fs::create_dir(dir.path().join("dist")).unwrap();
    fs::write(dir.path().join("dist/index.js"), "import x from 'left-pad';\n").unwrap();

    let output = distfix()
        .args(["transform", "--cwd"])
        .arg(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("warning[UNKNOWN_DEPENDENCY]"), "stderr: {stderr}");
    assert!(stderr.contains("left-pad"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Transformed 1 files"));
}
