//! Supporting-container lifecycle via the docker compose CLI.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::command_runner::CommandRunner;

/// Compose operations block at most this long.
const COMPOSE_TIMEOUT: Duration = Duration::from_secs(120);

/// Abstracts container orchestration so the bootstrap pipelines are
/// testable without a container runtime.
#[allow(async_fn_in_trait)]
pub trait ComposeDriver {
    /// Start the named services detached.
    ///
    /// # Errors
    ///
    /// Returns an error if the compose CLI cannot run or exits non-zero.
    async fn up(&self, services: &[&str]) -> Result<()>;

    /// Tear down the compose project.
    ///
    /// # Errors
    ///
    /// Returns an error if the compose CLI cannot run or exits non-zero.
    /// Callers in the teardown path treat this as best-effort.
    async fn down(&self) -> Result<()>;
}

/// Production driver — shells out to `docker compose`.
pub struct DockerCompose<'a, R: CommandRunner> {
    runner: &'a R,
}

impl<'a, R: CommandRunner> DockerCompose<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> ComposeDriver for DockerCompose<'_, R> {
    async fn up(&self, services: &[&str]) -> Result<()> {
        let mut args = vec!["compose", "up", "-d"];
        args.extend_from_slice(services);
        let output = self
            .runner
            .run_with_timeout("docker", &args, COMPOSE_TIMEOUT)
            .await
            .context("running docker compose up")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("docker compose up failed: {}", stderr.trim());
        }
        Ok(())
    }

    async fn down(&self) -> Result<()> {
        let output = self
            .runner
            .run_with_timeout("docker", &["compose", "down"], COMPOSE_TIMEOUT)
            .await
            .context("running docker compose down")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("docker compose down failed: {}", stderr.trim());
        }
        Ok(())
    }
}

/// Test driver — records calls and fails on demand.
#[cfg(test)]
#[derive(Default)]
pub struct MockCompose {
    pub fail_up: bool,
    pub calls: std::cell::RefCell<Vec<String>>,
}

#[cfg(test)]
impl ComposeDriver for MockCompose {
    async fn up(&self, services: &[&str]) -> Result<()> {
        self.calls.borrow_mut().push(format!("up {}", services.join(" ")));
        if self.fail_up {
            anyhow::bail!("docker compose up failed: simulated");
        }
        Ok(())
    }

    async fn down(&self) -> Result<()> {
        self.calls.borrow_mut().push("down".to_string());
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::os::unix::process::ExitStatusExt;
    use std::path::Path;
    use std::process::{ExitStatus, Output};

    /// Canned runner capturing every invocation.
    struct FakeRunner {
        exit_code_raw: i32,
        stderr: &'static str,
        invocations: RefCell<Vec<String>>,
    }

    impl FakeRunner {
        fn succeeding() -> Self {
            Self {
                exit_code_raw: 0,
                stderr: "",
                invocations: RefCell::new(Vec::new()),
            }
        }

        fn failing(stderr: &'static str) -> Self {
            Self {
                // Raw wait status 256 decodes to exit code 1.
                exit_code_raw: 256,
                stderr,
                invocations: RefCell::new(Vec::new()),
            }
        }

        fn record(&self, program: &str, args: &[&str]) -> Output {
            self.invocations
                .borrow_mut()
                .push(format!("{program} {}", args.join(" ")));
            Output {
                status: ExitStatus::from_raw(self.exit_code_raw),
                stdout: Vec::new(),
                stderr: self.stderr.as_bytes().to_vec(),
            }
        }
    }

    impl CommandRunner for FakeRunner {
        async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
            Ok(self.record(program, args))
        }

        async fn run_with_timeout(
            &self,
            program: &str,
            args: &[&str],
            _timeout: Duration,
        ) -> Result<Output> {
            Ok(self.record(program, args))
        }

        async fn run_in_dir(
            &self,
            program: &str,
            args: &[&str],
            _dir: &Path,
            _timeout: Duration,
        ) -> Result<Output> {
            Ok(self.record(program, args))
        }
    }

    #[tokio::test]
    async fn test_up_invokes_compose_with_services() {
        let runner = FakeRunner::succeeding();
        let compose = DockerCompose::new(&runner);
        compose.up(&["redis", "rabbitmq"]).await.expect("up succeeds");
        assert_eq!(
            runner.invocations.borrow().as_slice(),
            ["docker compose up -d redis rabbitmq"]
        );
    }

    #[tokio::test]
    async fn test_up_surfaces_stderr_on_nonzero_exit() {
        let runner = FakeRunner::failing("no compose file found");
        let compose = DockerCompose::new(&runner);
        let err = compose.up(&["redis"]).await.expect_err("up fails");
        assert!(err.to_string().contains("no compose file found"));
    }

    #[tokio::test]
    async fn test_down_invokes_compose_down() {
        let runner = FakeRunner::succeeding();
        let compose = DockerCompose::new(&runner);
        compose.down().await.expect("down succeeds");
        assert_eq!(runner.invocations.borrow().as_slice(), ["docker compose down"]);
    }

    #[tokio::test]
    async fn test_mock_compose_records_calls() {
        let mock = MockCompose::default();
        mock.up(&["redis"]).await.expect("up");
        mock.down().await.expect("down");
        assert_eq!(mock.calls.borrow().as_slice(), ["up redis", "down"]);
    }

    #[tokio::test]
    async fn test_mock_compose_up_failure_is_an_error() {
        let mock = MockCompose {
            fail_up: true,
            ..MockCompose::default()
        };
        assert!(mock.up(&["redis"]).await.is_err());
    }
}
