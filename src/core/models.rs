//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout the matrix
//! orchestrator. It includes models for trigger events, per-cell execution
//! results, failure kinds, and the aggregated run report.
//!
//! 此模块定义了整个矩阵编排器中使用的核心数据结构。
//! 它包括触发事件、单元执行结果、失败种类和聚合运行报告的模型。

use crate::infra::t;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// The external stimulus that starts an orchestration run. Only the two
/// version-control events the workflow recognizes are accepted; anything
/// else is rejected before planning.
///
/// 启动一次编排运行的外部触发事件。仅接受工作流识别的两种版本控制事件，
/// 其他一律在计划之前被拒绝。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum TriggerEvent {
    /// A push to the repository / 向仓库推送代码
    Push,
    /// A pull request against the repository / 针对仓库的拉取请求
    PullRequest,
}

impl FromStr for TriggerEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "push" => Ok(TriggerEvent::Push),
            "pull-request" | "pull_request" => Ok(TriggerEvent::PullRequest),
            other => Err(t!("trigger.unknown", event = other).to_string()),
        }
    }
}

impl fmt::Display for TriggerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriggerEvent::Push => write!(f, "push"),
            TriggerEvent::PullRequest => write!(f, "pull-request"),
        }
    }
}

/// Enumerates the possible kinds of a cell failure. The three stage kinds
/// mirror the cell's sequence; `Timeout` covers the whole sequence.
/// 枚举单元失败的可能种类。三个阶段种类对应单元的执行序列；`Timeout` 覆盖整个序列。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum FailureKind {
    /// The environment image could not be acquired or the container could
    /// not be started.
    /// 无法获取环境镜像或无法启动容器。
    Provision,
    /// The package-manager bootstrap or the dependency installation exited
    /// non-zero inside the container.
    /// 容器内的包管理器引导或依赖安装以非零状态退出。
    Setup,
    /// The test entry point exited non-zero.
    /// 测试入口以非零状态退出。
    Test,
    /// The cell exceeded its configured wall-clock budget.
    /// 单元超出了其配置的墙钟时间预算。
    Timeout,
}

impl FailureKind {
    /// A localized, human-readable label for the failure kind.
    pub fn label(&self, locale: &str) -> String {
        match self {
            FailureKind::Provision => t!("kind.provision", locale = locale).to_string(),
            FailureKind::Setup => t!("kind.setup", locale = locale).to_string(),
            FailureKind::Test => t!("kind.test", locale = locale).to_string(),
            FailureKind::Timeout => t!("kind.timeout", locale = locale).to_string(),
        }
    }
}

/// The final, immutable result of one matrix cell. Exactly one of these is
/// produced per declared version per run.
///
/// 单个矩阵单元的最终不可变结果。每次运行中，每个声明的版本恰好产生一个。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CellResult {
    /// The cell's whole sequence completed and the test entry point
    /// exited zero.
    /// 单元的整个序列完成，且测试入口以零状态退出。
    Passed {
        /// The version identifier of the cell / 单元的版本标识符
        version: String,
        /// The combined transcript of all stage commands / 所有阶段命令的合并输出
        output: String,
        /// Wall-clock time for the whole sequence / 整个序列的墙钟时间
        duration: Duration,
    },
    /// Some stage of the cell failed; siblings are unaffected.
    /// 单元的某个阶段失败；同级单元不受影响。
    Failed {
        /// The version identifier of the cell / 单元的版本标识符
        version: String,
        /// The combined transcript up to and including the failure / 直到失败为止的合并输出
        output: String,
        /// Which stage failed / 失败的阶段种类
        kind: FailureKind,
        /// Wall-clock time before the failure / 失败前的墙钟时间
        duration: Duration,
    },
    /// The run was cancelled before this cell finished.
    /// 运行在此单元完成之前被取消。
    Skipped {
        /// The version identifier of the cell / 单元的版本标识符
        version: String,
    },
}

impl CellResult {
    /// Gets the version identifier this result belongs to.
    /// 获取此结果所属的版本标识符。
    pub fn version(&self) -> &str {
        match self {
            CellResult::Passed { version, .. } => version,
            CellResult::Failed { version, .. } => version,
            CellResult::Skipped { version } => version,
        }
    }

    /// Checks if the result is any kind of failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, CellResult::Failed { .. })
    }

    /// Checks if the cell passed.
    pub fn is_passed(&self) -> bool {
        matches!(self, CellResult::Passed { .. })
    }

    /// Gets the failure kind, if the cell failed.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            CellResult::Failed { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Gets the combined stage transcript. Empty for skipped cells.
    /// 获取合并的阶段输出。跳过的单元为空。
    pub fn output(&self) -> &str {
        match self {
            CellResult::Passed { output, .. } => output,
            CellResult::Failed { output, .. } => output,
            CellResult::Skipped { .. } => "",
        }
    }

    /// Gets the duration of the cell. Returns None if not applicable.
    /// 获取单元的持续时间。如果不适用，则返回 None。
    pub fn duration(&self) -> Option<Duration> {
        match self {
            CellResult::Passed { duration, .. } => Some(*duration),
            CellResult::Failed { duration, .. } => Some(*duration),
            CellResult::Skipped { .. } => None,
        }
    }

    /// Gets the status of the cell as a string for display.
    /// 以字符串形式获取单元状态以供显示。
    pub fn status_str(&self, locale: &str) -> String {
        match self {
            CellResult::Passed { .. } => t!("status.passed", locale = locale).to_string(),
            CellResult::Failed { kind, .. } => kind.label(locale),
            CellResult::Skipped { .. } => t!("status.skipped", locale = locale).to_string(),
        }
    }

    /// Gets the CSS class used for this status in HTML reports.
    pub fn status_class(&self) -> &str {
        match self {
            CellResult::Passed { .. } => "status-passed",
            CellResult::Failed { kind, .. } => match kind {
                FailureKind::Provision => "status-provision",
                FailureKind::Setup => "status-setup",
                FailureKind::Test => "status-test",
                FailureKind::Timeout => "status-timeout",
            },
            CellResult::Skipped { .. } => "status-skipped",
        }
    }
}

/// The aggregated outcome of one orchestration run: the trigger that
/// started it, when it started, and one result per declared version.
///
/// 一次编排运行的聚合结果：启动它的触发事件、开始时间，以及每个声明版本的一个结果。
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// The trigger that started the run / 启动本次运行的触发事件
    pub trigger: TriggerEvent,
    /// When the run started / 运行开始时间
    pub started_at: DateTime<Local>,
    /// One result per declared version, in matrix order / 按矩阵顺序的每版本结果
    pub results: Vec<CellResult>,
}

impl RunReport {
    pub fn new(trigger: TriggerEvent, results: Vec<CellResult>) -> Self {
        Self {
            trigger,
            started_at: Local::now(),
            results,
        }
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r, CellResult::Skipped { .. }))
            .count()
    }

    /// The overall run status: the logical AND over all cell results.
    /// A skipped cell (cancelled run) does not count as passed.
    /// 整体运行状态：所有单元结果的逻辑与。被跳过的单元（运行被取消）不算通过。
    pub fn overall_passed(&self) -> bool {
        self.results.iter().all(|r| r.is_passed())
    }
}
