//! # Live session handles and exactly-once teardown.
//!
//! [`LiveSession`] holds whatever parts of the session are currently alive:
//! the allocated port, the supervised server and the browser. Handles are
//! installed as startup progresses, so teardown always releases exactly the
//! resources that exist at that moment, whether startup completed or died
//! halfway.
//!
//! ## Rules
//! - Teardown is **exactly-once**: handles are consumed on the first call;
//!   later calls are no-ops.
//! - Teardown never raises. Failures inside it are logged.
//! - Order: browser first (no more requests), then server.

use crate::core::navigate::Navigate;
use crate::core::server::Serve;

/// How to take the browser down.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Teardown {
    /// Let the browser flush and exit cleanly. Success path.
    Graceful,
    /// Terminate immediately. Interrupt path.
    Force,
}

/// Mutable bag of live resources for one render session.
#[derive(Default)]
pub struct LiveSession {
    pub(crate) port: Option<u16>,
    pub(crate) server: Option<Box<dyn Serve>>,
    pub(crate) browser: Option<Box<dyn Navigate>>,
}

impl LiveSession {
    /// Creates an empty session; handles are installed during startup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Port the server was started on, once allocated.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Records the allocated port.
    pub fn set_port(&mut self, port: u16) {
        self.port = Some(port);
    }

    /// Installs the server handle. Startup of the renderer skips pieces
    /// that are already installed, so tests can substitute fakes.
    pub fn attach_server(&mut self, server: Box<dyn Serve>) {
        self.port = Some(server.port());
        self.server = Some(server);
    }

    /// Installs the browser handle.
    pub fn attach_browser(&mut self, browser: Box<dyn Navigate>) {
        self.browser = Some(browser);
    }

    /// Releases every live resource. Safe to call more than once.
    pub async fn teardown(&mut self, mode: Teardown) {
        if let Some(mut browser) = self.browser.take() {
            match mode {
                Teardown::Graceful => browser.close().await,
                Teardown::Force => browser.kill().await,
            }
        }
        let port = self.port.take();
        if let Some(mut server) = self.server.take() {
            server.stop().await;
        } else if let Some(port) = port {
            // The port was allocated but the server handle never landed
            // here; whatever got as far as binding still has to go.
            crate::core::server::reclaim_port(port).await;
        }
    }
}
