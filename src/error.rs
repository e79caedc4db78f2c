//! Error types used by the render session and the setup layer.
//!
//! This module defines two error enums:
//!
//! - [`PrerenderError`]: fatal errors raised by the render session itself.
//!   Every variant aborts the whole run; there is no per-route retry.
//! - [`SetupError`]: errors raised by the collaborator layer (config file,
//!   route list, asset copying) before or after a session runs.
//!
//! Termination failures during teardown are deliberately **not** represented
//! here: stopping the server and closing the browser is best-effort and is
//! logged instead of raised, because it runs inside paths that must complete.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// # Fatal errors produced by a render session.
///
/// Any of these aborts the run. Teardown still executes before the error
/// reaches the caller.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PrerenderError {
    /// The whole probe range was exhausted without finding a bindable port.
    #[error("no free port in {start}..{end}")]
    NoPortAvailable {
        /// First port probed.
        start: u16,
        /// One past the last port probed.
        end: u16,
    },

    /// The static-server child process could not be spawned at all.
    #[error("failed to spawn static server: {source}")]
    ServerSpawn {
        #[source]
        source: std::io::Error,
    },

    /// The static server never answered its liveness probe in time.
    ///
    /// The partially started process is killed before this propagates.
    #[error("server on port {port} did not become ready within {attempts} probes")]
    ServerStartTimeout {
        /// Port the server was bound to.
        port: u16,
        /// Number of once-per-second probes that were attempted.
        attempts: u32,
    },

    /// The headless browser failed to launch or open its page.
    #[error("browser launch failed: {reason}")]
    BrowserLaunch { reason: String },

    /// A route navigation exceeded its bound.
    #[error("navigation to {url} timed out after {timeout:?}")]
    NavigationTimeout { url: String, timeout: Duration },

    /// A route navigation failed for a reason other than the timeout.
    #[error("navigation to {url} failed: {reason}")]
    NavigationFailure { url: String, reason: String },

    /// An output file (or its parent directory) could not be written.
    #[error("failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PrerenderError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use prerender::PrerenderError;
    ///
    /// let err = PrerenderError::NoPortAvailable { start: 5050, end: 5150 };
    /// assert_eq!(err.as_label(), "no_port_available");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PrerenderError::NoPortAvailable { .. } => "no_port_available",
            PrerenderError::ServerSpawn { .. } => "server_spawn",
            PrerenderError::ServerStartTimeout { .. } => "server_start_timeout",
            PrerenderError::BrowserLaunch { .. } => "browser_launch",
            PrerenderError::NavigationTimeout { .. } => "navigation_timeout",
            PrerenderError::NavigationFailure { .. } => "navigation_failure",
            PrerenderError::WriteFailure { .. } => "write_failure",
        }
    }
}

/// # Errors produced by the setup/collaborator layer.
///
/// These occur outside the render session proper: loading configuration,
/// reading route lists, validating the build directory, or copying assets.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SetupError {
    /// The configuration file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML (or has invalid fields).
    #[error("failed to parse config {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The CSV route list could not be read.
    #[error("failed to read route list {}: {source}", path.display())]
    RoutesRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The build directory has no index document to serve.
    #[error("no index.html in {}; run the build first or pass --serve-dir", serve_dir.display())]
    MissingIndex { serve_dir: PathBuf },

    /// Copying build assets into the output directory failed.
    #[error("failed to copy assets at {}: {source}", path.display())]
    AssetCopy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        let err = PrerenderError::ServerStartTimeout {
            port: 5050,
            attempts: 30,
        };
        assert_eq!(err.as_label(), "server_start_timeout");

        let err = PrerenderError::NavigationTimeout {
            url: "http://localhost:5050/".into(),
            timeout: Duration::from_secs(120),
        };
        assert_eq!(err.as_label(), "navigation_timeout");
    }

    #[test]
    fn test_display_mentions_the_port_range() {
        let err = PrerenderError::NoPortAvailable {
            start: 5050,
            end: 5150,
        };
        assert_eq!(err.to_string(), "no free port in 5050..5150");
    }
}
