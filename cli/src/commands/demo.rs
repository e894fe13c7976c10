//! `suna demo` — mock API plus static demo page, no external services.

use anyhow::{Context, Result};

use crate::output::OutputContext;
use crate::ports::{API_FALLBACK_PORT, API_PORT, FRONTEND_FALLBACK_PORT, FRONTEND_PORT};
use crate::server::ServeHandle;
use crate::{mock_api, site};

/// Run `suna demo`.
///
/// Writes the demo page, starts the mock API and the page server on
/// background tasks, opens a browser and blocks until Ctrl-C; teardown
/// then stops the servers in reverse start order.
///
/// # Errors
///
/// Returns an error if the working directory is unavailable, the demo
/// page cannot be written, or the signal handler cannot be installed.
/// Port exhaustion is reported on the console and exits cleanly.
pub async fn run(ctx: &OutputContext) -> Result<()> {
    super::init_tracing();

    ctx.header("Starting the Suna demo");

    let root = std::env::current_dir().context("determining working directory")?;
    let page = site::write_demo_page(&root)?;
    ctx.success(&format!("Demo page written to {}", page.display()));

    let (api, api_sel) =
        match ServeHandle::bind("mock-api", API_PORT, API_FALLBACK_PORT, mock_api::router()).await {
            Ok(bound) => bound,
            Err(e) => {
                ctx.error(&format!("Could not start the mock API: {e:#}"));
                return Ok(());
            }
        };
    if api_sel.fell_back {
        ctx.warn(&format!("Port {API_PORT} is in use; the mock API moved to {}", api.port()));
    }
    ctx.success(&format!("Mock API listening on port {}", api.port()));

    let (frontend, frontend_sel) = match ServeHandle::bind(
        "demo-page",
        FRONTEND_PORT,
        FRONTEND_FALLBACK_PORT,
        site::router(page),
    )
    .await
    {
        Ok(bound) => bound,
        Err(e) => {
            ctx.error(&format!("Could not start the demo page server: {e:#}"));
            api.shutdown().await;
            return Ok(());
        }
    };
    if frontend_sel.fell_back {
        ctx.warn(&format!(
            "Port {FRONTEND_PORT} is in use; the demo page moved to {}",
            frontend.port()
        ));
    }
    ctx.success(&format!("Demo page served on port {}", frontend.port()));

    let demo_url = format!("http://localhost:{}", frontend.port());
    if open::that(&demo_url).is_ok() {
        ctx.success(&format!("Opening {demo_url} in the browser"));
    } else {
        ctx.warn(&format!("Could not open a browser; visit {demo_url} manually"));
    }

    ctx.header("=================================");
    ctx.success("The Suna demo is up!");
    ctx.success(&format!("Demo page: http://localhost:{}", frontend.port()));
    ctx.success(&format!("Mock API:  http://localhost:{}", api.port()));
    ctx.header("=================================");
    ctx.info("Press Ctrl+C to stop the demo...");

    tokio::signal::ctrl_c().await.context("waiting for Ctrl+C")?;

    ctx.header("Stopping the demo...");
    // Reverse start order: page server first, then the API.
    frontend.shutdown().await;
    api.shutdown().await;
    ctx.success("All demo services stopped");

    Ok(())
}
