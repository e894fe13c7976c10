use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

/// Default timeout for one-shot commands (tool probes, compose up/down).
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for dependency installation (`npm install`, `pip install`).
pub const INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// Generic command execution with timeout and guaranteed process kill.
///
/// Every external tool invocation (docker, node, npm, pip) goes through
/// this trait; test doubles return canned results without spawning
/// anything.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a command with the default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;

    /// Run a command with a custom timeout (overrides default).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;

    /// Run a command with `dir` as its working directory.
    async fn run_in_dir(
        &self,
        program: &str,
        args: &[&str],
        dir: &Path,
        timeout: Duration,
    ) -> Result<Output>;
}

/// Production `CommandRunner` — uses tokio for async process execution
/// with guaranteed timeout and kill on all platforms.
///
/// `tokio::time::timeout` around `.output().await` does not kill the
/// child when the timeout fires on every platform — the future is
/// dropped but the OS process can keep running. `tokio::select!` with an
/// explicit `child.kill()` guarantees termination.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    async fn exec(
        &self,
        mut cmd: tokio::process::Command,
        program: &str,
        timeout: Duration,
    ) -> Result<Output> {
        let mut child = cmd
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        // Read stdout/stderr CONCURRENTLY with wait() to avoid pipe
        // deadlock: a child writing more than the OS pipe buffer blocks
        // on write, and a bare wait() would then never resolve.
        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stdout_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stderr_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                })
            } => result,
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {}s", timeout.as_secs())
            }
        }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.run_with_timeout(program, args, self.timeout).await
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args);
        self.exec(cmd, program, timeout).await
    }

    async fn run_in_dir(
        &self,
        program: &str,
        args: &[&str],
        dir: &Path,
        timeout: Duration,
    ) -> Result<Output> {
        let mut cmd = tokio::process::Command::new(program);
        cmd.args(args).current_dir(dir);
        self.exec(cmd, program, timeout).await
    }
}
