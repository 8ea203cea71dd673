//! # Container Engine Module / 容器引擎模块
//!
//! A thin wrapper around a docker-compatible CLI. Every matrix cell gets a
//! fresh, named container with the project workspace mounted read-write at
//! `/workspace`; setup and test stages run through `exec` against that
//! container, and removal is forced regardless of how the cell ended.
//!
//! 对 docker 兼容 CLI 的轻量封装。每个矩阵单元都会获得一个全新的命名容器，
//! 项目工作区以读写方式挂载到 `/workspace`；设置和测试阶段通过 `exec`
//! 在该容器中运行，无论单元如何结束都会强制删除容器。

use crate::infra::command::spawn_and_capture;
use std::path::Path;
use std::process::ExitStatus;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::process::Command;

/// The mount point of the project workspace inside every cell container.
pub const WORKSPACE_MOUNT: &str = "/workspace";

static CONTAINER_SEQ: AtomicU64 = AtomicU64::new(0);

/// Builds a unique container name for one cell. The version identifier is
/// embedded so a failed cell can be located from `docker ps` output alone.
/// 为一个单元构建唯一的容器名称。名称中嵌入版本标识符，
/// 以便仅凭 `docker ps` 输出即可定位失败的单元。
pub fn container_name(version: &str) -> String {
    let seq = CONTAINER_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("maya-matrix-{}-{}-{}", version, std::process::id(), seq)
}

/// A docker-compatible container engine, addressed by its binary name or
/// path. Cloned freely; it holds no state beyond the binary.
/// 通过二进制名称或路径寻址的 docker 兼容容器引擎。可自由克隆；除二进制外不持有任何状态。
#[derive(Debug, Clone)]
pub struct ContainerEngine {
    binary: String,
}

impl ContainerEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// The engine binary this wrapper drives.
    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.kill_on_drop(true);
        cmd
    }

    /// Checks whether an image is already present locally. The engine's
    /// `image inspect` prints a JSON array with one entry per match.
    /// 检查镜像是否已存在于本地。引擎的 `image inspect` 会为每个匹配项
    /// 输出 JSON 数组中的一个条目。
    pub async fn image_exists(&self, image: &str) -> bool {
        let mut cmd = self.command();
        cmd.args(["image", "inspect", image]);
        let (status, output) = spawn_and_capture(cmd).await;
        match status {
            Ok(s) if s.success() => serde_json::from_str::<serde_json::Value>(&output)
                .map(|v| v.as_array().is_some_and(|a| !a.is_empty()))
                .unwrap_or(false),
            _ => false,
        }
    }

    /// Pulls an image from the registry.
    pub async fn pull(&self, image: &str) -> (std::io::Result<ExitStatus>, String) {
        let mut cmd = self.command();
        cmd.args(["pull", image]);
        spawn_and_capture(cmd).await
    }

    /// Starts a detached, idle container for one cell with the workspace
    /// mounted. The container only terminates when removed.
    /// 为一个单元启动一个挂载了工作区的分离空闲容器。容器仅在被删除时终止。
    pub async fn start(
        &self,
        image: &str,
        name: &str,
        workspace: &Path,
    ) -> (std::io::Result<ExitStatus>, String) {
        let mount = format!("{}:{}", workspace.display(), WORKSPACE_MOUNT);
        let mut cmd = self.command();
        cmd.args(["run", "-d", "--name", name])
            .args(["-v", &mount, "-w", WORKSPACE_MOUNT])
            .arg(image)
            .args(["sleep", "infinity"]);
        spawn_and_capture(cmd).await
    }

    /// Runs one argv inside a running cell container.
    pub async fn exec(&self, name: &str, argv: &[String]) -> (std::io::Result<ExitStatus>, String) {
        let mut cmd = self.command();
        cmd.args(["exec", name]).args(argv);
        spawn_and_capture(cmd).await
    }

    /// Force-removes a cell container. Callers treat this as best-effort;
    /// the name may never have been created.
    /// 强制删除单元容器。调用方将其视为尽力而为；该名称可能从未被创建。
    pub async fn remove(&self, name: &str) -> (std::io::Result<ExitStatus>, String) {
        let mut cmd = self.command();
        cmd.args(["rm", "-f", name]);
        spawn_and_capture(cmd).await
    }
}
