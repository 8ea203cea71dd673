//! # Core Module / 核心模块
//!
//! This module contains the core functionality of Maya Matrix,
//! including data models, configuration, matrix planning and cell execution.
//!
//! 此模块包含 Maya Matrix 的核心功能，
//! 包括数据模型、配置、矩阵计划和单元执行。

pub mod config;
pub mod execution;
pub mod models;
pub mod planner;

// Re-exports
pub use config::MatrixConfig;
pub use execution::run_cell;
pub use models::CellResult;
