//! # Cell Execution Engine Module / 单元执行引擎模块
//!
//! This module runs one matrix cell from start to finish: provision the
//! pinned container image, run the setup sequence inside the container,
//! invoke the test entry point, and record the result. Each stage failure
//! maps to its own `FailureKind`; a cell never retries and never touches
//! another cell's state.
//!
//! 此模块从头到尾运行一个矩阵单元：置备固定的容器镜像，在容器内运行设置序列，
//! 调用测试入口并记录结果。每个阶段的失败映射到各自的 `FailureKind`；
//! 单元永不重试，也绝不触及其他单元的状态。

use colored::*;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        models::{CellResult, FailureKind},
        planner::Cell,
    },
    infra::{
        container::{ContainerEngine, container_name},
        t,
    },
};

/// Everything a cell needs to run. Built once per run from the matrix
/// configuration and shared read-only between all cells.
/// 单元运行所需的全部内容。每次运行根据矩阵配置构建一次，并在所有单元间只读共享。
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// The container engine driving the isolated environments.
    pub engine: ContainerEngine,
    /// Canonicalized host directory mounted into every cell container.
    pub workspace: PathBuf,
    /// Package-manager bootstrap argv (first setup call).
    pub bootstrap: Vec<String>,
    /// Dependency installation argv (second setup call).
    pub install: Vec<String>,
    /// Test entry point argv; the version identifier and `-v` are appended.
    pub test_command: Vec<String>,
    /// Wall-clock budget for one cell's whole sequence.
    pub timeout: Duration,
    /// Locale for progress messages.
    pub locale: String,
}

/// The main entry point for running a single matrix cell.
/// It wraps the staged sequence with the per-cell timeout and the run-wide
/// cancellation token, and tears the cell container down on every exit
/// path, so an aborted cell leaves nothing behind for its siblings.
///
/// # Arguments
/// * `cell` - The cell to execute
/// * `settings` - Shared run settings
/// * `token` - Run-wide cancellation token
///
/// # Returns
/// The `CellResult` for this cell. Infrastructure errors are folded into
/// the result rather than propagated; one cell's trouble is never another
/// cell's problem.
pub async fn run_cell(
    cell: Cell,
    settings: std::sync::Arc<RunSettings>,
    token: CancellationToken,
) -> CellResult {
    let locale = settings.locale.clone();
    let name = container_name(&cell.version);
    let start = Instant::now();

    let sequence = run_cell_inner(&cell, &settings, &name);

    let result = tokio::select! {
        biased;
        _ = token.cancelled() => {
            println!(
                "{}",
                t!("cell.cancelled", locale = &locale, version = &cell.version).yellow()
            );
            CellResult::Skipped {
                version: cell.version.clone(),
            }
        }
        res = tokio::time::timeout(settings.timeout, sequence) => match res {
            Ok(result) => result,
            Err(_) => {
                println!(
                    "{}",
                    t!(
                        "cell.timed_out",
                        locale = &locale,
                        version = &cell.version,
                        timeout = settings.timeout.as_secs()
                    )
                    .red()
                );
                CellResult::Failed {
                    version: cell.version.clone(),
                    output: t!("cell.timeout_message", locale = &locale).to_string(),
                    kind: FailureKind::Timeout,
                    duration: settings.timeout,
                }
            }
        },
    };

    // Teardown runs on every path, including timeout and cancellation. The
    // container may never have been created; removal is best-effort.
    let _ = settings.engine.remove(&name).await;

    match &result {
        CellResult::Passed { duration, .. } => {
            println!(
                "{}",
                t!(
                    "cell.passed",
                    locale = &locale,
                    version = &cell.version,
                    duration = format!("{:.2}", duration.as_secs_f64())
                )
                .green()
            );
        }
        CellResult::Failed { kind, .. } => {
            println!(
                "{}",
                t!(
                    "cell.failed",
                    locale = &locale,
                    version = &cell.version,
                    kind = kind.label(&locale),
                    duration = format!("{:.2}", start.elapsed().as_secs_f64())
                )
                .red()
            );
        }
        CellResult::Skipped { .. } => {}
    }

    result
}

/// The staged sequence of one cell: provision, setup, test. Strictly
/// sequential; the first non-zero exit ends the cell with that stage's
/// failure kind.
async fn run_cell_inner(cell: &Cell, settings: &RunSettings, name: &str) -> CellResult {
    let locale = &settings.locale;
    let start = Instant::now();
    let mut transcript = String::new();

    // Stage 1: provision. Pull the pinned image unless it is already
    // local, then start the idle cell container with the workspace mounted.
    println!(
        "{}",
        t!(
            "cell.provisioning",
            locale = locale,
            version = &cell.version,
            image = &cell.image
        )
        .blue()
    );

    if !settings.engine.image_exists(&cell.image).await {
        let (status, output) = settings.engine.pull(&cell.image).await;
        append_stage(&mut transcript, &format!("pull {}", cell.image), &output);
        if !stage_ok(status, &mut transcript) {
            return failed(cell, transcript, FailureKind::Provision, start);
        }
    }

    let (status, output) = settings
        .engine
        .start(&cell.image, name, &settings.workspace)
        .await;
    append_stage(&mut transcript, &format!("run {}", cell.image), &output);
    if !stage_ok(status, &mut transcript) {
        return failed(cell, transcript, FailureKind::Provision, start);
    }

    // Stage 2: setup. Bootstrap the embedded interpreter's package
    // manager, then install the development dependencies. Two ordered
    // calls; either one failing ends the cell.
    println!(
        "{}",
        t!("cell.setting_up", locale = locale, version = &cell.version).blue()
    );

    for argv in [&settings.bootstrap, &settings.install] {
        let (status, output) = settings.engine.exec(name, argv).await;
        append_stage(&mut transcript, &argv.join(" "), &output);
        if !stage_ok(status, &mut transcript) {
            return failed(cell, transcript, FailureKind::Setup, start);
        }
    }

    // Stage 3: test. The entry point gets the version identifier as its
    // sole positional argument plus a verbosity flag; its exit code is the
    // only signal consumed.
    println!(
        "{}",
        t!("cell.testing", locale = locale, version = &cell.version).blue()
    );

    let mut argv = settings.test_command.clone();
    argv.push(cell.version.clone());
    argv.push("-v".to_string());

    let (status, output) = settings.engine.exec(name, &argv).await;
    append_stage(&mut transcript, &argv.join(" "), &output);
    if !stage_ok(status, &mut transcript) {
        return failed(cell, transcript, FailureKind::Test, start);
    }

    CellResult::Passed {
        version: cell.version.clone(),
        output: transcript,
        duration: start.elapsed(),
    }
}

/// Appends one stage's command line and captured output to the transcript.
fn append_stage(transcript: &mut String, command: &str, output: &str) {
    transcript.push_str("$ ");
    transcript.push_str(command);
    transcript.push('\n');
    transcript.push_str(output);
}

/// Folds a stage's exit status into a pass/fail decision. A spawn error is
/// a failure like any other; its message joins the transcript.
fn stage_ok(status: std::io::Result<ExitStatus>, transcript: &mut String) -> bool {
    match status {
        Ok(s) => s.success(),
        Err(e) => {
            transcript.push_str(&e.to_string());
            transcript.push('\n');
            false
        }
    }
}

fn failed(cell: &Cell, transcript: String, kind: FailureKind, start: Instant) -> CellResult {
    CellResult::Failed {
        version: cell.version.clone(),
        output: transcript,
        kind,
        duration: start.elapsed(),
    }
}
