//! Command implementations

pub mod demo;
pub mod doctor;
pub mod quick;
pub mod up;
pub mod version;

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Defaults to `warn` so the mock servers stay silent request-to-request;
/// `RUST_LOG` opts into more.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .try_init();
}
