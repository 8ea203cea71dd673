//! # Matrix Planner Module / 矩阵计划模块
//!
//! This module validates the declared version axis and expands it into an
//! execution plan with exactly one cell per declared version. Validation
//! happens here, before anything is provisioned, so malformed matrices
//! never reach the container engine.
//!
//! 此模块验证声明的版本轴，并将其展开为每个声明版本恰好一个单元的执行计划。
//! 验证在置备任何资源之前进行，因此格式错误的矩阵永远不会到达容器引擎。

use crate::core::config::MatrixConfig;
use crate::infra::t;
use anyhow::{Result, bail};
use std::collections::HashSet;

/// One cell of the matrix: a version identifier and the image reference it
/// is pinned to.
/// 矩阵中的一个单元：版本标识符及其固定的镜像引用。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// The version identifier / 版本标识符
    pub version: String,
    /// The fully qualified image reference / 完整限定的镜像引用
    pub image: String,
}

/// Represents a complete execution plan for one run.
/// 表示一次运行的完整执行计划。
#[derive(Debug)]
pub struct ExecutionPlan {
    /// The cells to execute, in declared matrix order.
    /// 要执行的单元，按声明的矩阵顺序。
    pub cells: Vec<Cell>,
}

/// Checks a single version identifier for well-formedness. Identifiers end
/// up in image tags and container names, so they are restricted to the tag
/// character set.
///
/// 检查单个版本标识符的格式。标识符会出现在镜像标签和容器名称中，
/// 因此仅限于标签字符集。
pub fn validate_identifier(version: &str) -> Result<()> {
    if version.is_empty() {
        bail!(t!("plan.empty_identifier").to_string());
    }
    let well_formed = version
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    if !well_formed {
        bail!(t!("plan.malformed_identifier", version = version).to_string());
    }
    Ok(())
}

/// Creates an execution plan for the given matrix configuration.
///
/// The declared version list is the whole matrix: no identifier is skipped,
/// duplicated, or invented. An empty axis is a configuration error, and
/// every identifier is checked before a single cell is built.
///
/// 为给定的矩阵配置创建执行计划。
///
/// 声明的版本列表就是整个矩阵：不会跳过、重复或捏造任何标识符。
/// 空的版本轴是配置错误，并且在构建任何单元之前会检查每个标识符。
pub fn plan_execution(config: &MatrixConfig) -> Result<ExecutionPlan> {
    if config.versions.is_empty() {
        bail!(t!("plan.empty_matrix").to_string());
    }
    if config.image.is_empty() {
        bail!(t!("plan.empty_image").to_string());
    }
    if config.timeout_secs == 0 {
        bail!(t!("plan.zero_timeout").to_string());
    }

    let mut seen = HashSet::new();
    for version in &config.versions {
        validate_identifier(version)?;
        if !seen.insert(version.as_str()) {
            bail!(t!("plan.duplicate_identifier", version = version).to_string());
        }
    }

    let cells = config
        .versions
        .iter()
        .map(|version| Cell {
            version: version.clone(),
            image: config.image_ref(version),
        })
        .collect();

    Ok(ExecutionPlan { cells })
}
