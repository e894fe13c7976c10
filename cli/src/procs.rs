//! Spawned dev-server processes and their teardown order.

use std::path::Path;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::{Child, Command};

/// A named long-running child (frontend or backend dev server).
///
/// Stdio is inherited so the dev server's own output reaches the
/// terminal. `kill_on_drop` backstops teardown if the launcher exits
/// without reaching the interrupt path.
pub struct ChildProcess {
    name: &'static str,
    child: Child,
}

impl ChildProcess {
    /// Spawn `program` with `args`, using `dir` as working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned.
    pub fn spawn(name: &'static str, program: &str, args: &[&str], dir: &Path) -> Result<Self> {
        let child = Command::new(program)
            .args(args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program} for the {name}"))?;
        Ok(Self { name, child })
    }

    /// Display name of the service.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Force-terminate the child and reap it. Best effort.
    pub async fn terminate(mut self) {
        if let Err(e) = self.child.kill().await {
            tracing::warn!(process = self.name, error = %e, "terminate failed");
        }
    }
}

/// Children in launch order; shut down in reverse.
#[derive(Default)]
pub struct ProcessStack {
    children: Vec<ChildProcess>,
}

impl ProcessStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, child: ChildProcess) {
        self.children.push(child);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Terminate every child, last started first. Each child gets exactly
    /// one termination call; failures are logged, not escalated. Returns
    /// the names in the order they were stopped.
    pub async fn shutdown(&mut self) -> Vec<&'static str> {
        let mut stopped = Vec::new();
        while let Some(child) = self.children.pop() {
            let name = child.name();
            child.terminate().await;
            stopped.push(name);
        }
        stopped
    }
}
