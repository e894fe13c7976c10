//! Integration tests for the suna CLI surface.

#![allow(clippy::expect_used, deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn suna() -> Command {
    Command::cargo_bin("suna").expect("suna binary should exist")
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    // clap with arg_required_else_help shows help on stderr and exits 2
    suna()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Developer launcher for the Suna stack"));
}

#[test]
fn test_cli_help_flag_shows_help() {
    suna()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    suna()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("suna"));
}

#[test]
fn test_version_command_shows_version() {
    suna()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("suna 0.1.0"));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    suna()
        .arg("version")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"version":"0.1.0"}"#));
}

// --- Command hierarchy tests ---

#[test]
fn test_help_shows_demo_command() {
    suna()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo"));
}

#[test]
fn test_help_shows_up_command() {
    suna()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("up"));
}

#[test]
fn test_help_shows_quick_command() {
    suna()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("quick"));
}

#[test]
fn test_help_shows_doctor_command() {
    suna()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("doctor"));
}

#[test]
fn test_unknown_command_fails() {
    suna()
        .arg("bogus")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// --- Doctor ---

#[test]
fn test_doctor_json_outputs_valid_json() {
    let output = suna()
        .arg("doctor")
        .arg("--json")
        .output()
        .expect("doctor runs");
    assert!(output.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("doctor --json emits valid JSON");
    assert!(report.get("docker").is_some());
    assert!(report.get("node").is_some());
    assert!(report.get("npm").is_some());
    assert!(report["api_port_free"].is_boolean());
    assert!(report["frontend_port_free"].is_boolean());
}
