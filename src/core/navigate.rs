//! # Browser seam.
//!
//! [`Navigate`] is the boundary between the route loop and the headless
//! browser. The production implementation is
//! [`BrowserSession`](crate::BrowserSession); tests drive the loop with
//! scripted fakes instead of a real browser.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::PrerenderError;

/// Page navigation and capture, plus the two teardown flavors.
#[async_trait]
pub trait Navigate: Send {
    /// Navigates the page to `url`, waits for quiescence and returns the
    /// fully rendered HTML.
    ///
    /// Must complete within `timeout` or return
    /// [`PrerenderError::NavigationTimeout`].
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<String, PrerenderError>;

    /// Graceful close: lets the browser flush and exit on its own.
    ///
    /// Used on the success path. Best-effort; failures are logged, not
    /// raised.
    async fn close(&mut self);

    /// Immediate termination without waiting for a clean exit.
    ///
    /// Used on the interrupt path, where the process is about to exit
    /// anyway.
    async fn kill(&mut self);
}
