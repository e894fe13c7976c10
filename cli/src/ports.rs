//! TCP port probes and the single-fallback selection policy.

use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use thiserror::Error;

/// Default port for the mock API.
pub const API_PORT: u16 = 8000;
/// Alternate port when [`API_PORT`] is taken.
pub const API_FALLBACK_PORT: u16 = 8080;
/// Default port for the demo page server.
pub const FRONTEND_PORT: u16 = 3000;
/// Alternate port when [`FRONTEND_PORT`] is taken.
pub const FRONTEND_FALLBACK_PORT: u16 = 3001;

/// How long a probe connection may take before the port counts as free.
const PROBE_TIMEOUT: Duration = Duration::from_millis(250);

/// Port selection failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PortError {
    /// Primary and fallback ports are both bound by other processes.
    #[error("ports {primary} and {fallback} are both in use; close the applications using them")]
    BothInUse { primary: u16, fallback: u16 },
}

/// Outcome of [`select_port`], carrying whether the fallback was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSelection {
    pub port: u16,
    pub fell_back: bool,
}

/// Returns `true` when something accepts connections on `127.0.0.1:<port>`.
///
/// The result is advisory only: another process can claim the port
/// between this probe and a later bind, in which case the bind fails.
#[must_use]
pub fn port_in_use(port: u16) -> bool {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    TcpStream::connect_timeout(&addr, PROBE_TIMEOUT).is_ok()
}

/// Pick the first free port out of `primary` then `fallback`.
///
/// Exactly one fallback attempt is made; there is no retry loop.
///
/// # Errors
///
/// Returns [`PortError::BothInUse`] when both ports are taken.
pub fn select_port(primary: u16, fallback: u16) -> Result<PortSelection, PortError> {
    if !port_in_use(primary) {
        return Ok(PortSelection {
            port: primary,
            fell_back: false,
        });
    }
    if !port_in_use(fallback) {
        return Ok(PortSelection {
            port: fallback,
            fell_back: true,
        });
    }
    Err(PortError::BothInUse { primary, fallback })
}
