//! End-to-end tests for the tigert binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tigert() -> Command {
    let mut cmd = Command::cargo_bin("tigert").unwrap();
    cmd.env_remove("TIGERT_VERBOSE")
        .env_remove("TIGERT_CONFIG")
        .env("TIGERT_NO_COLOR", "1");
    cmd
}

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_help_lists_commands() {
    tigert()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("link"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("layout"));
}

#[test]
fn test_layout_text() {
    let dir = TempDir::new().unwrap();
    let classes = write(
        &dir,
        "SumRec.toml",
        "main_class = \"SumRec\"\n\n[[class]]\nname = \"SumRec\"\nmethods = [\"main\"]\n\n[[class]]\nname = \"Doit\"\nmethods = [\"doit\"]\n",
    );

    tigert()
        .current_dir(dir.path())
        .arg("layout")
        .arg(&classes)
        .assert()
        .success()
        .stdout(predicate::str::contains("class Doit extends Object (size 8, vtable .V_Doit)"))
        .stdout(predicate::str::contains("method +0    doit -> Doit_doit"))
        .stdout(predicate::str::contains("SumRec_main").not());
}

#[test]
fn test_layout_json() {
    let dir = TempDir::new().unwrap();
    let classes = write(
        &dir,
        "classes.toml",
        "[[class]]\nname = \"A\"\nfields = [\"x\"]\nmethods = [\"f\"]\n\n[[class]]\nname = \"B\"\nextends = \"A\"\nmethods = [\"f\"]\n",
    );

    let output = tigert()
        .current_dir(dir.path())
        .args(["layout", "--json"])
        .arg(&classes)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value[1]["name"], "B");
    assert_eq!(value[1]["methods"][0]["symbol"], "B_f");
    assert_eq!(value[1]["methods"][0]["offset"], 0);
}

#[test]
fn test_layout_reports_cycle() {
    let dir = TempDir::new().unwrap();
    let classes = write(
        &dir,
        "cycle.toml",
        "[[class]]\nname = \"A\"\nextends = \"B\"\n\n[[class]]\nname = \"B\"\nextends = \"A\"\n",
    );

    tigert()
        .current_dir(dir.path())
        .arg("layout")
        .arg(&classes)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Inheritance cycle"));
}

#[test]
fn test_link_missing_input() {
    let dir = TempDir::new().unwrap();

    tigert()
        .current_dir(dir.path())
        .args(["link", "missing.s", "--runtime-dir"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input path does not exist"));
}

#[test]
fn test_link_missing_runtime() {
    let dir = TempDir::new().unwrap();
    let asm = write(&dir, "SumRec.s", ".text\n");

    tigert()
        .current_dir(dir.path())
        .arg("link")
        .arg(&asm)
        .arg("--runtime-dir")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("libtiger_start.a"));
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = TempDir::new().unwrap();

    tigert()
        .current_dir(dir.path())
        .args(["--config", "nope.toml", "layout", "classes.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}
