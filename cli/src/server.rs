//! Background HTTP server lifecycle.

use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::ports::{self, PortSelection};

/// A local HTTP server running in a background task.
///
/// The handle owns the shutdown channel for the task; calling
/// [`ServeHandle::shutdown`] releases the socket deterministically and
/// waits for the task to exit. There is no draining of in-flight
/// requests beyond what the graceful-shutdown primitive provides.
pub struct ServeHandle {
    name: &'static str,
    port: u16,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl ServeHandle {
    /// Bind `router` to the first free port of `primary`/`fallback` and
    /// start serving.
    ///
    /// The port probe and the bind are separate steps, so a concurrent
    /// bind by another process can still make this fail after a
    /// successful probe.
    ///
    /// # Errors
    ///
    /// Returns an error when both ports are occupied or the bind itself
    /// fails.
    pub async fn bind(
        name: &'static str,
        primary: u16,
        fallback: u16,
        router: Router,
    ) -> Result<(Self, PortSelection)> {
        let selection = ports::select_port(primary, fallback)?;
        let listener = TcpListener::bind(("127.0.0.1", selection.port))
            .await
            .with_context(|| format!("binding {name} to port {}", selection.port))?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = serve.await {
                tracing::error!(server = name, error = %e, "server exited with error");
            }
        });

        tracing::info!(server = name, port = selection.port, "listening");
        Ok((
            Self {
                name,
                port: selection.port,
                shutdown_tx,
                task,
            },
            selection,
        ))
    }

    /// Port the server is actually listening on.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Stop the server and wait for its task to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.task.await {
            tracing::warn!(server = self.name, error = %e, "server task did not exit cleanly");
        }
        tracing::info!(server = self.name, "stopped");
    }
}
