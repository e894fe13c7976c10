//! `suna quick` — minimal start: core containers only, backend and
//! frontend run directly on the host.
//!
//! Unlike `up`, the env files are fixed literal blocks and the backend
//! runs as a host process (uvicorn) instead of a container. The
//! containers are restarted from a clean slate on every invocation.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::command_runner::{CommandRunner, INSTALL_TIMEOUT};
use crate::compose::ComposeDriver;
use crate::envfile::{self, EnvOutcome};
use crate::output::{OutputContext, progress};
use crate::procs::{ChildProcess, ProcessStack};

/// Grace period for uvicorn to come up before the frontend starts.
const BACKEND_SETTLE: Duration = Duration::from_secs(3);

/// Run `suna quick`.
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
    ctx.header("Starting Suna in simplified mode...");

    let root = std::env::current_dir().context("determining working directory")?;
    write_env_files(ctx, &root)?;

    ctx.header("Starting the Redis and RabbitMQ services...");
    // Restart from a clean slate; a failing down is not fatal here.
    if let Err(e) = compose.down().await {
        tracing::debug!(error = %e, "compose down before restart failed");
    }
    if let Err(e) = compose.up(&["redis", "rabbitmq"]).await {
        ctx.error(&format!("Failed to start Redis and RabbitMQ: {e:#}"));
        return Ok(());
    }
    ctx.success("Redis and RabbitMQ started");

    let mut stack = ProcessStack::new();

    match start_backend(ctx, runner, &root.join("backend")).await {
        Some(child) => stack.push(child),
        None => {
            ctx.error("Failed to start the backend. Core services are still running.");
            return Ok(());
        }
    }

    match start_frontend(ctx, runner, &root.join("frontend")).await {
        Some(child) => stack.push(child),
        None => {
            ctx.error("Failed to start the frontend. Stopping the backend...");
            for name in stack.shutdown().await {
                ctx.success(&format!("The {name} stopped"));
            }
            ctx.warn("Core services are still running; stop them with: docker compose down");
            return Ok(());
        }
    }

    ctx.success("=================================");
    ctx.success("Suna is up!");
    ctx.success("Frontend:    http://localhost:3000");
    ctx.success("Backend API: http://localhost:8000");
    ctx.success("API docs:    http://localhost:8000/docs");
    ctx.success("=================================");
    ctx.info("Press Ctrl+C to stop all services...");

    tokio::signal::ctrl_c().await.context("waiting for Ctrl+C")?;

    ctx.header("Stopping services...");
    for name in stack.shutdown().await {
        ctx.success(&format!("The {name} stopped"));
    }
    if let Err(e) = compose.down().await {
        ctx.warn(&format!("Container teardown reported a problem: {e:#}"));
    } else {
        ctx.success("Core services stopped");
    }
    ctx.success("All Suna services stopped");
    Ok(())
}

/// Write the fixed env files when they are absent.
fn write_env_files(ctx: &OutputContext, root: &Path) -> Result<()> {
    if envfile::write_backend_env_fixed(root)? == EnvOutcome::Created {
        ctx.warn("Created backend/.env with demo-only placeholder credentials");
    }
    if envfile::write_frontend_env_fixed(root)? == EnvOutcome::Created {
        ctx.warn("Created frontend/.env.local with demo-only placeholder credentials");
    }
    Ok(())
}

/// Install backend requirements (warn-only) and launch uvicorn.
/// Returns `None` after reporting when the server cannot be spawned.
async fn start_backend(
    ctx: &OutputContext,
    runner: &impl CommandRunner,
    backend_dir: &Path,
) -> Option<ChildProcess> {
    ctx.header("Starting the backend server...");

    // Best effort: a failing install is reported but the start proceeds,
    // since the requirements may already be satisfied system-wide.
    match runner
        .run_in_dir(
            "python3",
            &["-m", "pip", "install", "-r", "requirements.txt"],
            backend_dir,
            INSTALL_TIMEOUT,
        )
        .await
    {
        Ok(output) if !output.status.success() => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            ctx.warn(&format!("pip install reported a problem: {}", stderr.trim()));
        }
        Err(e) => ctx.warn(&format!("pip install could not run: {e:#}")),
        Ok(_) => {}
    }

    let args = ["-m", "uvicorn", "api:app", "--reload", "--host", "0.0.0.0", "--port", "8000"];
    match ChildProcess::spawn("backend server", "python3", &args, backend_dir) {
        Ok(child) => {
            ctx.success("Backend server starting: python3 -m uvicorn api:app --reload --host 0.0.0.0 --port 8000");
            ctx.warn("Waiting for the backend to come up...");
            tokio::time::sleep(BACKEND_SETTLE).await;
            Some(child)
        }
        Err(e) => {
            ctx.error(&format!("Failed to start the backend server: {e:#}"));
            None
        }
    }
}

/// Install frontend dependencies if absent (plain `npm install`, no
/// fallback in simplified mode), then launch the dev server.
async fn start_frontend(
    ctx: &OutputContext,
    runner: &impl CommandRunner,
    frontend_dir: &Path,
) -> Option<ChildProcess> {
    ctx.header("Starting the frontend...");

    if !frontend_dir.join("node_modules").exists() {
        ctx.warn("Installing frontend dependencies...");
        let spin = ctx
            .show_progress()
            .then(|| progress::spinner("Installing frontend dependencies"));
        let result = runner
            .run_in_dir("npm", &["install"], frontend_dir, INSTALL_TIMEOUT)
            .await;
        let ok = matches!(&result, Ok(output) if output.status.success());
        if let Some(pb) = spin {
            if ok {
                progress::finish_ok(&pb, "Frontend dependencies installed");
            } else {
                progress::finish_fail(&pb, "Frontend dependency install failed");
            }
        }
        if !ok {
            match result {
                Ok(output) => {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    ctx.error(&format!(
                        "Failed to install frontend dependencies: {}",
                        stderr.trim()
                    ));
                }
                Err(e) => ctx.error(&format!("Failed to install frontend dependencies: {e:#}")),
            }
            return None;
        }
    }

    match ChildProcess::spawn("frontend", "npm", &["run", "dev"], frontend_dir) {
        Ok(child) => {
            ctx.success("Frontend starting...");
            Some(child)
        }
        Err(e) => {
            ctx.error(&format!("Failed to start the frontend: {e:#}"));
            None
        }
    }
}
