//! # Maya Matrix Library / Maya Matrix 库
//!
//! This library provides the core functionality for the Maya Matrix tool,
//! a configuration-driven CI orchestrator that runs a plugin test suite
//! across a matrix of Maya versions, each inside an isolated container.
//!
//! 此库为 Maya Matrix 工具提供核心功能，
//! 这是一个配置驱动的 CI 编排器，可在一系列 Maya 版本的隔离容器中运行插件测试套件。
//!
//! ## Modules / 模块
//!
//! - `core` - Core data models, matrix planning and cell execution engine
//! - `infra` - Infrastructure services like command execution and the container engine
//! - `reporting` - Run result reporting and visualization
//! - `cli` - Command-line interface
//! - `commands` - Subcommand implementations
//!
//! - `core` - 核心数据模型、矩阵计划和单元执行引擎
//! - `infra` - 基础设施服务，如命令执行和容器引擎
//! - `reporting` - 运行结果报告和可视化
//! - `cli` - 命令行接口
//! - `commands` - 子命令实现

pub mod cli;
pub mod commands;
pub mod core;
pub mod infra;
pub mod reporting;

// Re-export commonly used items
pub use self::core::config;
pub use self::core::execution;
pub use self::core::models;

pub use rust_i18n::t;

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
