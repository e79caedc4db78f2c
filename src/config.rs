//! # Session input and runtime configuration.
//!
//! Two types live here:
//!
//! 1. [`RenderRequest`]: the fully resolved input for one render session,
//!    assembled by the caller (CLI, config file, route list). Immutable for
//!    the lifetime of the session.
//! 2. [`SessionConfig`]: the knobs of the orchestrator itself: port range,
//!    probe cadence, navigation bounds, restart cadence, teardown grace.
//!
//! ## Sentinel values
//! - `restart_every = 0` → the server is never recycled mid-run
//! - `settle = 0s` → no extra quiescence window after the load settles

use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fully resolved input for one render session.
///
/// The caller is responsible for validation: `serve_dir` must exist and
/// contain an index document, and both directories should be absolute.
#[derive(Clone, Debug)]
pub struct RenderRequest {
    /// Routes to render, in render order. Duplicates are allowed.
    ///
    /// A route is a path, optionally with a query suffix (`/about?x=1`).
    pub routes: Vec<String>,
    /// Absolute output directory.
    pub out_dir: PathBuf,
    /// Absolute directory the static server exposes as its document root.
    pub serve_dir: PathBuf,
    /// `true` → one sanitized file per route (`about-x-1.html` style);
    /// `false` → nested directories mirroring the route path.
    pub flat_output: bool,
    /// Resume mode: a route whose output file already exists is not
    /// re-rendered.
    pub skip_existing: bool,
}

/// Runtime configuration for the render session.
///
/// Defines:
/// - **Port allocation**: where the probe range starts
/// - **Server supervision**: liveness probing, stop grace, restart cadence
/// - **Navigation**: per-route timeout and quiescence window
/// - **Teardown**: final delay that lets in-flight kill signals land
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// First port probed by the allocator. The probe range spans 100 ports.
    pub start_port: u16,

    /// Number of once-per-`probe_interval` liveness probes before the
    /// server start is declared failed.
    pub probe_attempts: u32,

    /// Delay between liveness probes.
    pub probe_interval: Duration,

    /// Upper bound for a single route navigation, capture included.
    pub navigation_timeout: Duration,

    /// Extra quiescence window after the navigation settles, letting
    /// client-side fetches that fire after the load event finish.
    ///
    /// `Duration::ZERO` disables the window.
    pub settle: Duration,

    /// Recycle the static server after this many rendered routes, bounding
    /// resource growth on very long runs.
    ///
    /// `0` disables recycling.
    pub restart_every: usize,

    /// How long the graduated stop waits for the server process to exit
    /// after the group signal before falling through to port reclamation.
    pub stop_grace: Duration,

    /// Final delay before process exit on the interrupt path, so that kill
    /// signals issued during teardown are delivered before this process
    /// itself disappears.
    pub exit_delay: Duration,

    /// Capacity of the event bus ring buffer (min 1, clamped by the bus).
    pub bus_capacity: usize,

    /// Static-server argv template. `{dir}` and `{port}` are substituted
    /// at spawn time.
    pub serve_command: Vec<String>,

    /// Forward the static server's stdout/stderr into the log.
    pub forward_server_output: bool,
}

impl SessionConfig {
    /// Returns the restart cadence as an `Option`.
    ///
    /// - `None` → the server is never recycled
    /// - `Some(n)` → recycled before the `n+1`th, `2n+1`th, ... render
    #[inline]
    pub fn restart_cadence(&self) -> Option<usize> {
        if self.restart_every == 0 {
            None
        } else {
            Some(self.restart_every)
        }
    }

    /// Resolves the serve-command template into a concrete argv.
    pub fn serve_argv(&self, serve_dir: &Path, port: u16) -> Vec<String> {
        let dir = serve_dir.display().to_string();
        let port = port.to_string();
        self.serve_command
            .iter()
            .map(|arg| arg.replace("{dir}", &dir).replace("{port}", &port))
            .collect()
    }
}

impl Default for SessionConfig {
    /// Default configuration:
    ///
    /// - `start_port = 5050` (probe range 5050..5150)
    /// - `probe_attempts = 30`, `probe_interval = 1s`
    /// - `navigation_timeout = 120s`, `settle = 500ms`
    /// - `restart_every = 1000`
    /// - `stop_grace = 3s`, `exit_delay = 1s`
    /// - `serve_command = npx serve -s {dir} -l {port}`
    fn default() -> Self {
        Self {
            start_port: 5050,
            probe_attempts: 30,
            probe_interval: Duration::from_secs(1),
            navigation_timeout: Duration::from_secs(120),
            settle: Duration::from_millis(500),
            restart_every: 1000,
            stop_grace: Duration::from_secs(3),
            exit_delay: Duration::from_secs(1),
            bus_capacity: 1024,
            serve_command: vec![
                "npx".into(),
                "serve".into(),
                "-s".into(),
                "{dir}".into(),
                "-l".into(),
                "{port}".into(),
            ],
            forward_server_output: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_argv_substitutes_placeholders() {
        let cfg = SessionConfig::default();
        let argv = cfg.serve_argv(Path::new("/srv/build"), 5051);
        assert_eq!(argv, vec!["npx", "serve", "-s", "/srv/build", "-l", "5051"]);
    }

    #[test]
    fn test_restart_cadence_sentinel() {
        let mut cfg = SessionConfig::default();
        assert_eq!(cfg.restart_cadence(), Some(1000));
        cfg.restart_every = 0;
        assert_eq!(cfg.restart_cadence(), None);
    }
}
