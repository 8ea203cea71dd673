// src/commands/run.rs

use anyhow::{Context, Result};
use colored::*;
use futures::{StreamExt, stream};
use std::{fs, path::PathBuf, sync::Arc, time::Duration};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        config::MatrixConfig,
        execution::{RunSettings, run_cell},
        models::{CellResult, FailureKind, RunReport, TriggerEvent},
        planner::{self, Cell},
    },
    infra::{command::split_command, container::ContainerEngine, t},
    reporting::{generate_html_report, print_failure_details, print_summary},
};

/// Arguments of the `run` subcommand, already parsed and typed.
pub struct RunArgs {
    pub config: PathBuf,
    pub jobs: Option<usize>,
    pub event: TriggerEvent,
    pub engine: Option<String>,
    pub timeout_secs: Option<u64>,
    pub html: Option<PathBuf>,
}

pub async fn execute(args: RunArgs) -> Result<()> {
    let mut config = MatrixConfig::load(&args.config)?;
    let locale = config.language.clone();
    rust_i18n::set_locale(&locale);

    // Fold the CLI overrides into the configuration first, so validation
    // sees the values the run will actually use.
    if let Some(engine) = args.engine {
        config.engine = engine;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        config.timeout_secs = timeout_secs;
    }

    // Validate the whole matrix before provisioning anything.
    let plan = planner::plan_execution(&config)?;

    let workspace = fs::canonicalize(&config.workspace).with_context(|| {
        t!(
            "run.workspace_not_found",
            locale = &locale,
            path = config.workspace.display()
        )
        .to_string()
    })?;

    let settings = Arc::new(RunSettings {
        engine: ContainerEngine::new(config.engine.clone()),
        workspace,
        bootstrap: split_command(&config.bootstrap)?,
        install: split_command(&config.install)?,
        test_command: split_command(&config.test_command)?,
        timeout: Duration::from_secs(config.timeout_secs),
        locale: locale.clone(),
    });

    let started_at = chrono::Local::now();
    let jobs = args.jobs.unwrap_or_else(num_cpus::get).max(1);

    println!(
        "{}",
        t!(
            "run.header",
            locale = &locale,
            trigger = args.event,
            image = config.image.yellow()
        )
        .bold()
    );
    println!(
        "{}",
        t!(
            "run.matrix",
            locale = &locale,
            count = plan.cells.len(),
            versions = config.versions.join(", "),
            jobs = jobs
        )
    );

    let token = setup_signal_handler(&locale)?;

    let results = run_cells(plan.cells, settings, jobs, token).await;
    let report = RunReport {
        trigger: args.event,
        started_at,
        results,
    };

    print_summary(&report.results, &locale);

    if let Some(report_path) = &args.html {
        println!(
            "\n{}",
            t!(
                "run.writing_html",
                locale = &locale,
                path = report_path.display()
            )
        );
        if let Err(e) = generate_html_report(&report, report_path, &locale) {
            eprintln!("{} {}", t!("run.html_failed", locale = &locale).red(), e);
        }
    }

    // Overall status is the AND over all cells; the per-cell results above
    // have already been surfaced individually.
    if report.overall_passed() {
        println!("\n{}", t!("run.all_passed", locale = &locale).green().bold());
        Ok(())
    } else {
        let failures: Vec<_> = report.results.iter().filter(|r| r.is_failure()).collect();
        print_failure_details(&failures, &locale);
        anyhow::bail!(t!("run.run_failed", locale = &locale).to_string());
    }
}

fn setup_signal_handler(locale: &str) -> Result<CancellationToken> {
    let token = CancellationToken::new();
    let token_clone = token.clone();
    let locale = locale.to_string();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            println!("\n{}", t!("run.shutdown_signal", locale = &locale).yellow());
            token_clone.cancel();
        }
    });

    Ok(token)
}

/// Fans the cells out over `jobs` concurrent workers and collects exactly
/// one result per cell, restored to declared matrix order. Cells share
/// nothing; a panicked cell is folded into a failure for its own version
/// and never disturbs the others.
async fn run_cells(
    cells: Vec<Cell>,
    settings: Arc<RunSettings>,
    jobs: usize,
    token: CancellationToken,
) -> Vec<CellResult> {
    let tasks = stream::iter(cells.into_iter().enumerate().map(|(index, cell)| {
        let settings = Arc::clone(&settings);
        let token = token.clone();
        let version = cell.version.clone();

        async move {
            let result = match tokio::spawn(run_cell(cell, settings, token)).await {
                Ok(result) => result,
                Err(e) => CellResult::Failed {
                    version,
                    output: e.to_string(),
                    kind: FailureKind::Provision,
                    duration: Duration::default(),
                },
            };
            (index, result)
        }
    }));

    let mut indexed: Vec<(usize, CellResult)> = tasks.buffer_unordered(jobs).collect().await;
    indexed.sort_by_key(|(index, _)| *index);
    indexed.into_iter().map(|(_, result)| result).collect()
}
