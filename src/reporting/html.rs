//! # HTML Reporting Module / HTML 报告模块
//!
//! This module generates a standalone HTML report for one orchestration
//! run: run metadata (trigger event, start time), summary counts, and a
//! per-version table with the failure transcripts in collapsible blocks.
//!
//! 此模块为一次编排运行生成独立的 HTML 报告：
//! 运行元数据（触发事件、开始时间）、摘要计数，
//! 以及带有可折叠失败输出块的每版本表格。

use anyhow::{Context, Result};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::fs;
use std::path::Path;

use crate::core::models::{CellResult, RunReport};
use crate::infra::t;

/// Embedded CSS for the report / 报告的嵌入式 CSS
const STYLE: &str = r#"
body { font-family: -apple-system, "Segoe UI", sans-serif; margin: 2rem auto; max-width: 64rem; color: #24292f; }
h1 { border-bottom: 1px solid #d0d7de; padding-bottom: .4rem; }
.meta { color: #57606a; margin-bottom: 1.2rem; }
.summary { display: flex; gap: 1rem; margin: 1rem 0 1.6rem; }
.summary .card { border: 1px solid #d0d7de; border-radius: .4rem; padding: .6rem 1.2rem; text-align: center; }
.summary .count { display: block; font-size: 1.6rem; font-weight: 600; }
table { border-collapse: collapse; width: 100%; }
th, td { border: 1px solid #d0d7de; padding: .45rem .7rem; text-align: left; }
th { background: #f6f8fa; }
.status-passed { color: #1a7f37; font-weight: 600; }
.status-failed, .status-provision, .status-setup, .status-test, .status-timeout { color: #cf222e; font-weight: 600; }
.status-skipped { color: #57606a; }
details { margin-top: .3rem; }
pre { background: #f6f8fa; padding: .7rem; border-radius: .4rem; overflow-x: auto; font-size: .85rem; }
"#;

/// Generates the HTML report for a run and writes it to `output_path`.
///
/// # Arguments
/// * `report` - The aggregated run report
/// * `output_path` - Where to write the HTML file
/// * `locale` - The locale for all labels
pub fn generate_html_report(report: &RunReport, output_path: &Path, locale: &str) -> Result<()> {
    let markup = render(report, locale);
    fs::write(output_path, markup.into_string()).with_context(|| {
        t!("report.html_write_failed", path = output_path.display()).to_string()
    })?;
    Ok(())
}

fn render(report: &RunReport, locale: &str) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (t!("html.title", locale = locale)) }
                style { (PreEscaped(STYLE)) }
            }
            body {
                h1 { (t!("html.header", locale = locale)) }
                p .meta {
                    (t!(
                        "html.meta",
                        locale = locale,
                        trigger = report.trigger,
                        started = report.started_at.format("%Y-%m-%d %H:%M:%S")
                    ))
                }
                div .summary {
                    div .card {
                        span .count { (report.results.len()) }
                        (t!("html.total", locale = locale))
                    }
                    div .card {
                        span .count .status-passed { (report.passed_count()) }
                        (t!("html.passed", locale = locale))
                    }
                    div .card {
                        span .count .status-failed { (report.failed_count()) }
                        (t!("html.failed", locale = locale))
                    }
                    div .card {
                        span .count .status-skipped { (report.skipped_count()) }
                        (t!("html.skipped", locale = locale))
                    }
                }
                table {
                    thead {
                        tr {
                            th { (t!("html.col_version", locale = locale)) }
                            th { (t!("html.col_status", locale = locale)) }
                            th { (t!("html.col_duration", locale = locale)) }
                        }
                    }
                    tbody {
                        @for result in &report.results {
                            (render_row(result, locale))
                        }
                    }
                }
            }
        }
    }
}

fn render_row(result: &CellResult, locale: &str) -> Markup {
    let duration = result
        .duration()
        .map(|d| format!("{:.2}s", d.as_secs_f64()))
        .unwrap_or_else(|| "N/A".to_string());

    html! {
        tr {
            td { (result.version()) }
            td {
                span class=(result.status_class()) { (result.status_str(locale)) }
                // Transcripts only matter when something went wrong.
                @if result.is_failure() {
                    details {
                        summary { (t!("html.toggle_output", locale = locale)) }
                        pre { (result.output()) }
                    }
                }
            }
            td { (duration) }
        }
    }
}
