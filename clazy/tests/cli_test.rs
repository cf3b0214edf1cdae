//! End-to-end tests of the command line: dumps on disk in, warnings and fixed sources out.
#![allow(clippy::unwrap_used)]

mod common;

use anyhow::Result;
use assert_cmd::Command;
use clazy::entry_point::run_with_args_to;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SOURCE: &str = "bool b = qgetenv(\"HOME\").isEmpty();\n";

/// Writes `main.cpp` and its dump into `dir`.
fn write_project(dir: &Path) -> Result<()> {
    let (unit, _, _) = common::qgetenv_unit(SOURCE, "\"HOME\"", "isEmpty");
    fs::write(dir.join("main.cpp"), SOURCE)?;
    let dump = serde_json::json!({ "file": "main.cpp", "unit": unit });
    fs::write(dir.join("main.ast.json"), serde_json::to_string(&dump)?)?;
    Ok(())
}

fn clazy() -> Result<Command> {
    let mut cmd = Command::cargo_bin("clazy-bin")?;
    cmd.env_remove("CLAZY_CHECKS").env_remove("CLAZY_FIXIT");
    Ok(cmd)
}

#[test]
fn test_list_checks() -> Result<()> {
    clazy()?
        .arg("--list-checks")
        .assert()
        .success()
        .stdout(predicate::str::contains("qgetenv"))
        .stdout(predicate::str::contains("rule-of-three"))
        .stdout(predicate::str::contains("qt4-qstring-from-array"));
    Ok(())
}

#[test]
fn test_warning_exits_with_one() -> Result<()> {
    let temp = TempDir::new()?;
    write_project(temp.path())?;
    clazy()?
        .arg(temp.path())
        .arg("--checks")
        .arg("qgetenv")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[-Wclazy-qgetenv]"))
        .stdout(predicate::str::contains("main.cpp:1:10"));
    Ok(())
}

#[test]
fn test_json_output() -> Result<()> {
    let temp = TempDir::new()?;
    write_project(temp.path())?;
    let output = clazy()?
        .arg(temp.path())
        .args(["--checks", "level0", "--fixits", "fix-qgetenv", "--json"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["summary"]["total_diagnostics"], 1);
    assert_eq!(report["summary"]["fixable_count"], 1);
    let diagnostic = &report["files"][0]["diagnostics"][0];
    assert_eq!(diagnostic["check"], "qgetenv");
    assert_eq!(diagnostic["line"], 1);
    Ok(())
}

#[test]
fn test_apply_rewrites_source() -> Result<()> {
    let temp = TempDir::new()?;
    write_project(temp.path())?;
    clazy()?
        .arg(temp.path())
        .args(["--checks", "qgetenv", "--fixits", "fix-qgetenv", "--apply"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Applied fix-its to 1 file(s)"));

    let fixed = fs::read_to_string(temp.path().join("main.cpp"))?;
    assert_eq!(fixed, "bool b = qEnvironmentVariableIsEmpty(\"HOME\");\n");
    Ok(())
}

#[test]
fn test_apply_without_fixits_leaves_source() -> Result<()> {
    let temp = TempDir::new()?;
    write_project(temp.path())?;
    clazy()?
        .arg(temp.path())
        .args(["--checks", "qgetenv", "--apply"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Applied fix-its to 0 file(s)"));
    assert_eq!(fs::read_to_string(temp.path().join("main.cpp"))?, SOURCE);
    Ok(())
}

#[test]
fn test_unknown_check_is_config_error() -> Result<()> {
    let temp = TempDir::new()?;
    clazy()?
        .arg(temp.path())
        .args(["--checks", "no-such-check"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown check `no-such-check`"));
    Ok(())
}

#[test]
fn test_config_file_selects_checks() -> Result<()> {
    let temp = TempDir::new()?;
    write_project(temp.path())?;
    fs::write(
        temp.path().join(".clazy.toml"),
        "[clazy]\nchecks = [\"level1\", \"no-qgetenv\"]\n",
    )?;
    clazy()?
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No warnings"));

    // The command line wins over the file
    clazy()?
        .arg(temp.path())
        .args(["--checks", "qgetenv"])
        .assert()
        .code(1);
    Ok(())
}

#[test]
fn test_environment_overrides_config_file() -> Result<()> {
    let temp = TempDir::new()?;
    write_project(temp.path())?;
    fs::write(
        temp.path().join(".clazy.toml"),
        "[clazy]\nchecks = [\"qgetenv\"]\n",
    )?;
    clazy()?
        .arg(temp.path())
        .env("CLAZY_CHECKS", "qset-intersects")
        .assert()
        .success();
    Ok(())
}

#[test]
fn test_broken_dump_is_reported_not_fatal() -> Result<()> {
    let temp = TempDir::new()?;
    write_project(temp.path())?;
    fs::write(temp.path().join("broken.ast.json"), "{ not json")?;
    let output = clazy()?
        .arg(temp.path())
        .args(["--checks", "qgetenv", "--json"])
        .output()?;
    assert_eq!(output.status.code(), Some(1));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["summary"]["total_units"], 1);
    assert_eq!(report["summary"]["load_errors_count"], 1);
    let dump = report["load_errors"][0]["dump"].as_str().unwrap();
    assert!(dump.ends_with("broken.ast.json"));
    Ok(())
}

#[test]
fn test_unknown_fixit_in_process() -> Result<()> {
    let temp = TempDir::new()?;
    let mut buffer = Vec::new();
    let code = run_with_args_to(
        vec![
            temp.path().to_string_lossy().into_owned(),
            "--fixits".to_owned(),
            "fix-nothing".to_owned(),
        ],
        &mut buffer,
    )?;
    assert_eq!(code, 2);
    assert!(buffer.is_empty());
    Ok(())
}
