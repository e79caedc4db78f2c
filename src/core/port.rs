//! # Local port allocation.
//!
//! Probes a bounded range of ports sequentially; a port counts as available
//! if a short-lived listener can bind on it. The listener is dropped before
//! the port is returned, so the probe does **not** reserve the port; a race
//! with another process between probe and server bind is possible and
//! accepted.

use tokio::net::TcpListener;

use crate::error::PrerenderError;

/// Width of the probe range.
const PORT_SPAN: u16 = 100;

/// Finds an unused local TCP port, probing `start_port..start_port+100`.
///
/// Returns the first port a listener could bind on, or
/// [`PrerenderError::NoPortAvailable`] once the range is exhausted. The
/// caller treats exhaustion as fatal for the session.
pub async fn allocate_port(start_port: u16) -> Result<u16, PrerenderError> {
    allocate_within(start_port, PORT_SPAN).await
}

async fn allocate_within(start_port: u16, span: u16) -> Result<u16, PrerenderError> {
    let end = start_port.saturating_add(span);
    for port in start_port..end {
        if let Ok(listener) = TcpListener::bind(("127.0.0.1", port)).await {
            drop(listener);
            return Ok(port);
        }
    }
    Err(PrerenderError::NoPortAvailable {
        start: start_port,
        end,
    })
}
