//! Integration tests for the sharpen CLI
//!
//! These tests verify the CLI behavior end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper function to create a test CLI command
#[allow(deprecated)]
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("sharpen").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// Temporary project with one clean and one broken source
fn create_test_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("Good.cs"),
        "namespace N;\n\nclass Good\n{\n    void M() { var x = (1, 2); }\n}\n",
    )
    .unwrap();
    fs::write(temp_dir.path().join("Bad.cs"), "class C { int x }\n").unwrap();
    temp_dir
}

#[test]
fn test_help_command() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resilient, lossless C# parser"))
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_version_command() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_version_detailed() {
    cli()
        .args(["version", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sharpen"))
        .stdout(predicate::str::contains("Build information:"));
}

#[test]
fn test_parse_clean_file() {
    let project = create_test_project();
    cli()
        .arg("parse")
        .arg(project.path().join("Good.cs"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Files parsed: 1"))
        .stdout(predicate::str::contains("No issues found"));
}

#[test]
fn test_parse_reports_errors_and_fails() {
    let project = create_test_project();
    cli()
        .arg("parse")
        .arg(project.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[CS1002]"))
        .stdout(predicate::str::contains("Bad.cs:1:"))
        .stdout(predicate::str::contains("Files parsed: 2"));
}

#[test]
fn test_parse_compact_format() {
    let project = create_test_project();
    cli()
        .args(["parse", "--format", "compact"])
        .arg(project.path().join("Bad.cs"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("error CS1002"))
        .stdout(predicate::str::contains("1 file(s), 1 error(s), 0 warning(s)"));
}

#[test]
fn test_parse_json_format() {
    let project = create_test_project();
    let output = cli()
        .args(["parse", "--format", "json"])
        .arg(project.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["files_parsed"], 2);
    assert_eq!(value["summary"]["errors"], 1);
    let diagnostics = value["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["code"], "CS1002");
    assert_eq!(diagnostics[0]["line"], 1);
    assert!(diagnostics[0]["file"].as_str().unwrap().ends_with("Bad.cs"));
}

#[test]
fn test_parse_language_version_flag() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("Program.cs");
    fs::write(&file, "a();\nb();\n").unwrap();

    cli().arg("parse").arg(&file).assert().success();
    cli()
        .args(["parse", "--lang-version", "8"])
        .arg(&file)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[CS8107]"));
}

#[test]
fn test_parse_invalid_language_version() {
    let project = create_test_project();
    cli()
        .args(["parse", "--lang-version", "banana"])
        .arg(project.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid language version"));
}

#[test]
fn test_parse_uses_discovered_config() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join(".sharpenrc.toml"),
        "[parser]\nlanguageVersion = \"7.3\"\n",
    )
    .unwrap();
    fs::write(temp_dir.path().join("Program.cs"), "a();\nb();\n").unwrap();

    cli()
        .arg("parse")
        .arg(temp_dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[CS8107]"));
}

#[test]
fn test_parse_explicit_missing_config() {
    let project = create_test_project();
    cli()
        .args(["--config", "does-not-exist.toml", "parse"])
        .arg(project.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_parse_skips_excluded_directories() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("obj")).unwrap();
    fs::write(temp_dir.path().join("obj/Broken.cs"), "class {").unwrap();
    fs::write(temp_dir.path().join("Ok.cs"), "class Ok { }\n").unwrap();

    cli()
        .arg("parse")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Files parsed: 1"));
}

#[test]
fn test_parse_missing_path() {
    cli()
        .args(["parse", "no/such/file.cs"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Path not found"));
}

#[test]
fn test_parse_prints_tree() {
    let project = create_test_project();
    cli()
        .args(["parse", "--tree"])
        .arg(project.path().join("Bad.cs"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("CompilationUnit@0..18"))
        .stdout(predicate::str::contains("Semicolon@").and(predicate::str::contains("<missing>")));
}

#[test]
fn test_tokens_command() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("A.cs");
    fs::write(&file, "class C {}").unwrap();

    cli()
        .arg("tokens")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("ClassKw@0..5 \"class\""))
        .stdout(predicate::str::contains("Whitespace@5..6 \" \""))
        .stdout(predicate::str::contains("Ident@6..7 \"C\""));
}
