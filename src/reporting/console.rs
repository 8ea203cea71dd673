//! # Console Reporting Module / 控制台报告模块
//!
//! This module handles the display of run reports in the console.
//! It prints a colorful per-version summary table and, for failed cells,
//! the full stage transcripts with the failure kind called out, so a failed
//! matrix cell can be located and reproduced from the console alone.
//!
//! 此模块处理控制台中运行报告的显示。
//! 它打印彩色的每版本摘要表格，并为失败的单元打印完整的阶段输出及失败种类，
//! 因此仅凭控制台即可定位和复现失败的矩阵单元。

use crate::core::models::{CellResult, FailureKind};
use crate::infra::t;
use colored::*;

/// Prints a formatted summary of all cell results to the console.
/// One line per declared version: status, version identifier, duration,
/// and the failure kind for failed cells.
///
/// 在控制台打印所有单元结果的格式化摘要。
/// 每个声明的版本一行：状态、版本标识符、持续时间，以及失败单元的失败种类。
pub fn print_summary(results: &[CellResult], locale: &str) {
    println!("\n{}", t!("report.summary_banner", locale = locale).bold());

    for result in results {
        // Pad before coloring; the escape bytes would otherwise count
        // toward the column width.
        let status_padded = format!("{:<18}", result.status_str(locale));
        let duration_str = result
            .duration()
            .map(|d| format!("{:.2?}", d))
            .unwrap_or_else(|| "N/A".to_string());

        let status_colored = match result {
            CellResult::Passed { .. } => status_padded.green(),
            CellResult::Failed { .. } => status_padded.red(),
            CellResult::Skipped { .. } => status_padded.dimmed(),
        };

        println!(
            "  - {} | {:<16} | {:>10}",
            status_colored,
            result.version(),
            duration_str
        );
    }
}

/// Prints detailed information about failed cells: the failure kind and
/// the full transcript of every stage that ran. Each failure is local to
/// its own version; the details identify which matrix cell to look at.
///
/// 打印失败单元的详细信息：失败种类以及已运行的每个阶段的完整输出。
/// 每个失败仅限于其自身版本；详细信息标明应查看哪个矩阵单元。
pub fn print_failure_details(failures: &[&CellResult], locale: &str) {
    if failures.is_empty() {
        return;
    }

    println!(
        "\n{}",
        t!("report.failure_banner", locale = locale).red().bold()
    );
    println!("{}", "-".repeat(80));

    for (i, result) in failures.iter().enumerate() {
        println!(
            "[{}/{}] {} '{}'",
            i + 1,
            failures.len(),
            t!("report.failure_header", locale = locale).red(),
            result.version().cyan()
        );

        if let CellResult::Failed { output, kind, .. } = result {
            let log_header = match kind {
                FailureKind::Provision => t!("report.provision_log", locale = locale),
                FailureKind::Setup => t!("report.setup_log", locale = locale),
                FailureKind::Test | FailureKind::Timeout => t!("report.test_log", locale = locale),
            };
            println!("\n--- {} ({}) ---\n", log_header.yellow(), kind.label(locale));
            println!("{}", output);
            println!("\n{}", "-".repeat(80));
        }
    }
}
