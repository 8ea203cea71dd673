//! # Matrix Orchestration Integration Tests / 矩阵编排集成测试
//!
//! These tests drive the real binary against a stub container engine, so
//! the full provision → setup → test sequence runs without a container
//! runtime. The stub forces chosen versions to fail at chosen stages,
//! which is exactly the leverage needed to check that cells are
//! independent and that failure kinds stay distinguishable.
//!
//! 这些测试使用桩容器引擎驱动真实二进制文件，因此无需容器运行时即可运行
//! 完整的置备 → 设置 → 测试序列。桩引擎可以强制所选版本在所选阶段失败，
//! 这正是检验单元相互独立、失败种类可区分所需的手段。

#![cfg(unix)]

mod common;

use assert_cmd::prelude::*;
use common::{
    DEFAULT_VERSIONS, StubBehavior, write_matrix_config, write_matrix_config_with_timeout,
    write_stub_engine,
};
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn matrix_command(config: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("maya-matrix").unwrap();
    cmd.arg("run")
        .arg("--lang")
        .arg("en")
        .arg("--config")
        .arg(config)
        .arg("--jobs")
        .arg("3");
    cmd
}

#[test]
fn all_cells_pass() {
    let temp_dir = TempDir::new().unwrap();
    let engine = write_stub_engine(temp_dir.path(), &StubBehavior::default());
    let config = write_matrix_config(temp_dir.path(), &engine, &DEFAULT_VERSIONS);

    matrix_command(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("All matrix cells passed!"))
        .stdout(predicate::str::contains("[2020] passed"))
        .stdout(predicate::str::contains("[2022] passed"))
        .stdout(predicate::str::contains("[2023] passed"));
}

#[test]
fn one_test_failure_does_not_halt_the_others() {
    let temp_dir = TempDir::new().unwrap();
    let engine = write_stub_engine(
        temp_dir.path(),
        &StubBehavior {
            fail_test: vec!["2022"],
            ..Default::default()
        },
    );
    let config = write_matrix_config(temp_dir.path(), &engine, &DEFAULT_VERSIONS);

    // 2022 fails its test stage; 2020 and 2023 must still run to
    // completion and pass, and the overall run must fail.
    matrix_command(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("[2020] passed"))
        .stdout(predicate::str::contains("[2023] passed"))
        .stdout(predicate::str::contains("Test Failed"))
        .stderr(predicate::str::contains("Matrix run failed"));
}

#[test]
fn provision_failure_is_distinguishable_from_a_test_failure() {
    let temp_dir = TempDir::new().unwrap();
    let engine = write_stub_engine(
        temp_dir.path(),
        &StubBehavior {
            fail_pull: vec!["2022"],
            ..Default::default()
        },
    );
    let config = write_matrix_config(temp_dir.path(), &engine, &DEFAULT_VERSIONS);

    matrix_command(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Infra Failed"))
        .stdout(predicate::str::contains("Test Failed").not())
        .stdout(predicate::str::contains("[2020] passed"))
        .stdout(predicate::str::contains("[2023] passed"));
}

#[test]
fn setup_failure_stops_only_its_own_cell() {
    let temp_dir = TempDir::new().unwrap();
    let engine = write_stub_engine(
        temp_dir.path(),
        &StubBehavior {
            fail_setup: vec!["2020"],
            ..Default::default()
        },
    );
    let config = write_matrix_config(temp_dir.path(), &engine, &DEFAULT_VERSIONS);

    matrix_command(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Setup Failed"))
        .stdout(predicate::str::contains("[2022] passed"))
        .stdout(predicate::str::contains("[2023] passed"))
        // The failing cell's transcript names the failing command.
        .stdout(predicate::str::contains("pip install failed"));
}

#[test]
fn a_hung_test_times_out_without_stalling_siblings() {
    let temp_dir = TempDir::new().unwrap();
    let engine = write_stub_engine(
        temp_dir.path(),
        &StubBehavior {
            hang_test: vec!["2022"],
            ..Default::default()
        },
    );
    let config = write_matrix_config_with_timeout(temp_dir.path(), &engine, &DEFAULT_VERSIONS, 1);

    // 2022's test stage sleeps past the 1 s budget; its cell must end as
    // a timeout, distinct from a plain test failure, while the siblings
    // run to completion.
    matrix_command(&config)
        .assert()
        .failure()
        .stdout(predicate::str::contains("[2022] timed out"))
        .stdout(predicate::str::contains("Timed Out"))
        .stdout(predicate::str::contains("Test Failed").not())
        .stdout(predicate::str::contains("[2020] passed"))
        .stdout(predicate::str::contains("[2023] passed"));
}

#[test]
fn zero_timeout_on_the_cli_is_rejected_before_provisioning() {
    let temp_dir = TempDir::new().unwrap();
    let engine = write_stub_engine(temp_dir.path(), &StubBehavior::default());
    let config = write_matrix_config(temp_dir.path(), &engine, &DEFAULT_VERSIONS);

    // The config carries a valid timeout; the override must go through the
    // same validation gate instead of sailing past it.
    matrix_command(&config)
        .arg("--timeout-secs")
        .arg("0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout_secs"))
        .stdout(predicate::str::contains("provisioning").not());
}

#[test]
fn summary_lists_every_declared_version_exactly_once() {
    let temp_dir = TempDir::new().unwrap();
    let engine = write_stub_engine(
        temp_dir.path(),
        &StubBehavior {
            fail_test: vec!["2022"],
            ..Default::default()
        },
    );
    let config = write_matrix_config(temp_dir.path(), &engine, &DEFAULT_VERSIONS);

    let output = matrix_command(&config).output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    let summary = stdout
        .split("--- Matrix Summary ---")
        .nth(1)
        .expect("summary banner missing");
    let summary = summary.split("--- Failure Details ---").next().unwrap();

    for version in DEFAULT_VERSIONS.iter() {
        let count = summary
            .lines()
            .filter(|line| line.contains(&format!("| {:<16} |", version)))
            .count();
        assert_eq!(count, 1, "expected exactly one summary row for {version}");
    }
}

#[test]
fn summary_columns_stay_aligned_when_colors_are_forced() {
    let temp_dir = TempDir::new().unwrap();
    let engine = write_stub_engine(temp_dir.path(), &StubBehavior::default());
    let config = write_matrix_config(temp_dir.path(), &engine, &DEFAULT_VERSIONS);

    let output = matrix_command(&config)
        .env("CLICOLOR_FORCE", "1")
        .env_remove("NO_COLOR")
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);

    // The status field is padded to its column width before the color
    // escapes wrap it, so the padding survives with colors on.
    assert!(
        stdout.contains(&format!("{:<18}", "Passed")),
        "summary status column lost its padding: {stdout}"
    );
}

#[test]
fn empty_matrix_is_rejected_before_provisioning() {
    let temp_dir = TempDir::new().unwrap();
    let engine = write_stub_engine(temp_dir.path(), &StubBehavior::default());
    let config = write_matrix_config(temp_dir.path(), &engine, &[]);

    matrix_command(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("version matrix is empty"))
        // Nothing was provisioned, so no cell output exists.
        .stdout(predicate::str::contains("provisioning").not());
}

#[test]
fn duplicate_version_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let engine = write_stub_engine(temp_dir.path(), &StubBehavior::default());
    let config = write_matrix_config(temp_dir.path(), &engine, &["2023", "2023"]);

    matrix_command(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Duplicate version identifier"));
}

#[test]
fn html_report_is_written() {
    let temp_dir = TempDir::new().unwrap();
    let engine = write_stub_engine(
        temp_dir.path(),
        &StubBehavior {
            fail_test: vec!["2022"],
            ..Default::default()
        },
    );
    let config = write_matrix_config(temp_dir.path(), &engine, &DEFAULT_VERSIONS);
    let report_path = temp_dir.path().join("report.html");

    matrix_command(&config)
        .arg("--html")
        .arg(&report_path)
        .assert()
        .failure();

    let html = std::fs::read_to_string(&report_path).expect("HTML report missing");
    assert!(html.contains("Maya Matrix Report"));
    assert!(html.contains("2022"));
    assert!(html.contains("Test Failed"));
    // The aggregate failed-count card carries its own class, not the class
    // of any one failure kind.
    assert!(html.contains("status-failed"));
}
