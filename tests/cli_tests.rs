//! # CLI Integration Tests / CLI 集成测试
//!
//! Surface-level tests of the command-line interface: help output,
//! argument validation, and the `init` subcommand.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

#[test]
fn help_lists_subcommands() {
    let mut cmd = Command::cargo_bin("maya-matrix").unwrap();
    cmd.arg("--lang").arg("en").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn run_with_missing_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("maya-matrix").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("run")
        .arg("--lang")
        .arg("en")
        .arg("--config")
        .arg("DoesNotExist.toml");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn unknown_trigger_event_is_rejected() {
    let mut cmd = Command::cargo_bin("maya-matrix").unwrap();
    cmd.arg("run")
        .arg("--lang")
        .arg("en")
        .arg("--event")
        .arg("schedule");

    // Only push and pull-request exist; clap rejects everything else
    // before any configuration is read.
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn init_non_interactive_creates_a_starter_config() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("maya-matrix").unwrap();
    cmd.current_dir(temp_dir.path())
        .arg("--lang")
        .arg("en")
        .arg("init")
        .arg("--non-interactive");

    cmd.assert().success();

    let config_path = temp_dir.path().join("MayaMatrix.toml");
    let content = std::fs::read_to_string(&config_path).expect("MayaMatrix.toml missing");
    assert!(content.contains("mottosso/mayabase"));
    assert!(content.contains("versions"));

    // The starter file must itself be a loadable matrix configuration.
    let parsed: maya_matrix::config::MatrixConfig = toml::from_str(&content).unwrap();
    assert!(!parsed.versions.is_empty());
}

#[test]
fn no_subcommand_prints_help_and_succeeds() {
    let mut cmd = Command::cargo_bin("maya-matrix").unwrap();
    cmd.arg("--lang").arg("en");

    cmd.assert().success();
}
