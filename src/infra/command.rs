use crate::infra::t;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::LinesStream;

/// Splits a shell-style command line into an argv vector.
/// Environment variables and `~` are expanded first, then the line is
/// tokenized with shell quoting rules.
///
/// 将 shell 风格的命令行拆分为 argv 向量。
/// 先展开环境变量和 `~`，然后按 shell 引用规则进行分词。
///
/// # Arguments
/// * `raw` - The command line as written in the configuration file
///
/// # Returns
/// The argv vector, or an error if expansion or tokenization fails or the
/// command is empty.
pub fn split_command(raw: &str) -> Result<Vec<String>> {
    let expanded = shellexpand::full(raw)
        .with_context(|| t!("command.expand_failed", command = raw).to_string())?
        .to_string();

    let parts = shlex::split(&expanded)
        .ok_or_else(|| anyhow::anyhow!(t!("command.parse_failed", command = expanded).to_string()))?;

    if parts.is_empty() {
        anyhow::bail!(t!("command.empty").to_string());
    }

    Ok(parts)
}

/// Spawns a command and captures its stdout and stderr.
/// The two output streams are merged line by line into a single transcript,
/// which is fully drained before the exit status is collected so the child
/// can never block on a full pipe.
///
/// 派生一个命令并捕获其 stdout 和 stderr。
/// 两个输出流按行合并为一个转录文本，并在收集退出状态之前完全读取，
/// 因此子进程永远不会因管道已满而阻塞。
///
/// # Arguments
/// * `cmd` - The `tokio::process::Command` to execute.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The merged stdout and stderr as a `String`.
pub async fn spawn_and_capture(
    mut cmd: tokio::process::Command,
) -> (std::io::Result<std::process::ExitStatus>, String) {
    let mut child = match cmd
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => return (Err(e), String::new()),
    };

    let Some(stdout) = child.stdout.take() else {
        return (
            Err(std::io::Error::other(
                t!("command.capture_stdout_failed").to_string(),
            )),
            String::new(),
        );
    };
    let Some(stderr) = child.stderr.take() else {
        return (
            Err(std::io::Error::other(
                t!("command.capture_stderr_failed").to_string(),
            )),
            String::new(),
        );
    };

    let stdout_lines = LinesStream::new(BufReader::new(stdout).lines());
    let stderr_lines = LinesStream::new(BufReader::new(stderr).lines());
    let mut merged = stdout_lines.merge(stderr_lines);

    let mut transcript = String::new();
    while let Some(line) = merged.next().await {
        match line {
            Ok(line) => {
                transcript.push_str(&line);
                transcript.push('\n');
            }
            // A read error on one stream ends the capture; the exit status
            // below still tells the caller how the process finished.
            Err(_) => break,
        }
    }

    let status = child.wait().await;
    (status, transcript)
}
