use crate::infra::t;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Represents the matrix configuration, loaded from a TOML file
/// (`MayaMatrix.toml` by default). It declares the version axis and the
/// commands that are executed inside each per-version container.
///
/// 代表从 TOML 文件（默认为 `MayaMatrix.toml`）加载的矩阵配置。
/// 它声明版本轴以及在每个版本容器内执行的命令。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatrixConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// Defaults to "en" if not specified.
    ///
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。
    /// 如果未指定，则默认为 "en"。
    #[serde(default = "default_language")]
    pub language: String,

    /// The container engine binary used to provision and drive the isolated
    /// environments. Anything with a docker-compatible CLI works.
    /// 用于置备和驱动隔离环境的容器引擎二进制文件。任何具有 docker 兼容 CLI 的程序均可。
    #[serde(default = "default_engine")]
    pub engine: String,

    /// The image family. Each cell runs in `<image>:<version>`.
    /// 镜像系列。每个单元在 `<image>:<version>` 中运行。
    pub image: String,

    /// The host-application versions to evaluate, one cell per entry.
    /// 要评估的宿主应用版本，每个条目对应一个单元。
    pub versions: Vec<String>,

    /// The host directory mounted at `/workspace` inside each container.
    /// 挂载到每个容器内 `/workspace` 的主机目录。
    #[serde(default = "default_workspace")]
    pub workspace: PathBuf,

    /// Command line that bootstraps the embedded interpreter's package
    /// manager inside the container, for the current user scope.
    /// 在容器内为当前用户引导嵌入式解释器包管理器的命令行。
    #[serde(default = "default_bootstrap")]
    pub bootstrap: String,

    /// Command line that installs the development dependencies from the
    /// declared requirements manifest, for the current user scope.
    /// 从声明的依赖清单为当前用户安装开发依赖的命令行。
    #[serde(default = "default_install")]
    pub install: String,

    /// Command line of the test entry point. The version identifier and a
    /// `-v` flag are appended at invocation time.
    /// 测试入口的命令行。调用时会附加版本标识符和 `-v` 标志。
    #[serde(default = "default_test_command")]
    pub test_command: String,

    /// Wall-clock budget for one cell's whole sequence, in seconds.
    /// 单个单元整个序列的墙钟时间预算（秒）。
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl MatrixConfig {
    /// Reads and parses a matrix configuration file. Validation of the
    /// version axis happens later, in the planner.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| t!("config.read_failed", path = path.display()).to_string())?;
        let config: MatrixConfig = toml::from_str(&content)
            .with_context(|| t!("config.parse_failed").to_string())?;
        Ok(config)
    }

    /// The fully qualified image reference for one version of the matrix.
    pub fn image_ref(&self, version: &str) -> String {
        format!("{}:{}", self.image, version)
    }
}

fn default_language() -> String {
    "en".to_string()
}

fn default_engine() -> String {
    "docker".to_string()
}

fn default_workspace() -> PathBuf {
    PathBuf::from(".")
}

fn default_bootstrap() -> String {
    "mayapy -m ensurepip --user".to_string()
}

fn default_install() -> String {
    "mayapy -m pip install --user -r requirements-dev.txt".to_string()
}

fn default_test_command() -> String {
    "mayapy scripts/run_tests.py".to_string()
}

fn default_timeout_secs() -> u64 {
    1800
}
