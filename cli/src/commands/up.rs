//! `suna up` — full local bootstrap: containers plus the frontend dev server.
//!
//! The pipeline runs a fixed sequence of steps, each gating the next:
//! prerequisites, env files, supporting containers, frontend install,
//! frontend dev server, then a blocking wait for Ctrl-C. Failures after
//! the containers start do not unwind them outside the interrupt path.

use std::path::Path;

use anyhow::{Context, Result};

use crate::command_runner::{CommandRunner, INSTALL_TIMEOUT};
use crate::compose::ComposeDriver;
use crate::envfile::{self, EnvOutcome};
use crate::output::{OutputContext, progress};
use crate::procs::{ChildProcess, ProcessStack};

use super::doctor;

/// Run `suna up`.
///
/// # Errors
///
/// Returns an error for unexpected failures (working directory, env file
/// I/O, signal handler); pipeline failures are reported and exit cleanly.
pub async fn run(
    ctx: &OutputContext,
    runner: &impl CommandRunner,
    compose: &impl ComposeDriver,
) -> Result<()> {
    super::init_tracing();
    ctx.header("Starting Suna in local development mode...");

    if !doctor::ensure_prerequisites(ctx, runner).await {
        ctx.error("Prerequisites are not met. Install the missing tools and try again.");
        return Ok(());
    }

    let root = std::env::current_dir().context("determining working directory")?;
    ensure_env_files(ctx, &root)?;

    ctx.header("Starting backend services (Redis, RabbitMQ and the API)...");
    if let Err(e) = compose.up(&["redis", "rabbitmq", "backend"]).await {
        ctx.error(&format!("Failed to start backend services: {e:#}"));
        return Ok(());
    }
    ctx.success("Backend services started");

    let mut stack = ProcessStack::new();
    match start_frontend(ctx, runner, &root.join("frontend")).await {
        Some(child) => stack.push(child),
        None => {
            ctx.error("Failed to start the frontend. Backend services are still running.");
            ctx.warn("Stop them with: docker compose down");
            return Ok(());
        }
    }

    ctx.success("=================================");
    ctx.success("Suna is up:");
    ctx.success("API:      http://localhost:8000");
    ctx.success("Frontend: http://localhost:3000");
    ctx.success("=================================");
    ctx.info("Press Ctrl+C to stop the services...");

    tokio::signal::ctrl_c().await.context("waiting for Ctrl+C")?;

    ctx.header("Stopping services...");
    for name in stack.shutdown().await {
        ctx.success(&format!("The {name} stopped"));
    }
    if let Err(e) = compose.down().await {
        ctx.warn(&format!("Container teardown reported a problem: {e:#}"));
    } else {
        ctx.success("Backend services stopped");
    }
    ctx.success("All services stopped");
    Ok(())
}

/// Materialize missing env files from the checked-in examples.
/// Existing files are never touched; a missing example is reported but
/// does not stop the pipeline.
fn ensure_env_files(ctx: &OutputContext, root: &Path) -> Result<()> {
    ctx.header("Checking environment files...");

    match envfile::ensure_backend_env(root)? {
        EnvOutcome::Created => {
            ctx.warn("Backend .env was missing; created it from .env.example");
            ctx.warn("The generated file contains demo-only placeholder credentials");
        }
        EnvOutcome::Exists => ctx.success("Backend .env file exists"),
        EnvOutcome::ExampleMissing => {
            ctx.error("backend/.env.example not found; cannot create .env");
        }
    }

    match envfile::ensure_frontend_env(root)? {
        EnvOutcome::Created => {
            ctx.warn("Frontend .env.local was missing; created it from .env.example");
            ctx.warn("The generated file contains demo-only placeholder credentials");
        }
        EnvOutcome::Exists => ctx.success("Frontend .env.local file exists"),
        EnvOutcome::ExampleMissing => {
            ctx.error("frontend/.env.example not found; cannot create .env.local");
        }
    }

    Ok(())
}

/// Install dependencies if needed, then launch the dev server.
/// Returns `None` after reporting when any part fails.
async fn start_frontend(
    ctx: &OutputContext,
    runner: &impl CommandRunner,
    frontend_dir: &Path,
) -> Option<ChildProcess> {
    ctx.header("Starting the frontend dev server...");

    if !frontend_dir.join("package.json").exists() {
        ctx.error("package.json not found in the frontend directory");
        return None;
    }

    if !frontend_dir.join("node_modules").exists() {
        ctx.warn("Frontend dependencies are not installed. Installing...");
        if !npm_install(ctx, runner, frontend_dir).await {
            return None;
        }
    }

    match ChildProcess::spawn("frontend dev server", "npm", &["run", "dev"], frontend_dir) {
        Ok(child) => {
            ctx.success("Frontend dev server started");
            Some(child)
        }
        Err(e) => {
            ctx.error(&format!("Failed to start the frontend dev server: {e:#}"));
            None
        }
    }
}

/// Install frontend dependencies: `--legacy-peer-deps` first, one plain
/// retry as the fallback strategy.
async fn npm_install(ctx: &OutputContext, runner: &impl CommandRunner, dir: &Path) -> bool {
    let spin = ctx
        .show_progress()
        .then(|| progress::spinner("Installing frontend dependencies"));

    let first = runner
        .run_in_dir("npm", &["install", "--legacy-peer-deps"], dir, INSTALL_TIMEOUT)
        .await;
    let ok = match first {
        Ok(output) if output.status.success() => true,
        _ => {
            ctx.warn("npm install --legacy-peer-deps failed; retrying without the flag...");
            match runner.run_in_dir("npm", &["install"], dir, INSTALL_TIMEOUT).await {
                Ok(output) if output.status.success() => true,
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    ctx.error(&format!(
                        "Failed to install frontend dependencies: {}",
                        stderr.trim()
                    ));
                    false
                }
                Err(e) => {
                    ctx.error(&format!("Failed to install frontend dependencies: {e:#}"));
                    false
                }
            }
        }
    };

    if let Some(pb) = spin {
        if ok {
            progress::finish_ok(&pb, "Frontend dependencies installed");
        } else {
            progress::finish_fail(&pb, "Frontend dependency install failed");
        }
    } else if ok {
        ctx.success("Frontend dependencies installed");
    }
    ok
}
