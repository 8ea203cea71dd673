//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for Maya Matrix,
//! including command execution, the container engine wrapper, and i18n support.
//!
//! 此模块为 Maya Matrix 提供基础设施服务，
//! 包括命令执行、容器引擎封装和国际化支持。

pub mod command;
pub mod container;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
