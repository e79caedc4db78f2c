//! # Stdout progress reporter.
//!
//! [`ProgressWriter`] renders session events as human-readable progress
//! lines. This output is advisory only and not a machine-readable contract.
//!
//! ## Output format
//! ```text
//! [server] starting on port 5050
//! [server] ready on port 5050
//! [browser] ready
//! [2/14] /about (eta 1m42s)
//!   saved about/index.html (45.1 KiB in 840 ms)
//! [3/14] /contact skipped (exists)
//! [server] restarting on port 5050
//! [shutdown] interrupt received, tearing down
//! [shutdown] teardown complete
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::Subscribe;

/// Stdout progress-line subscriber.
pub struct ProgressWriter;

#[async_trait]
impl Subscribe for ProgressWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::ServerStarting => {
                if let Some(port) = e.port {
                    println!("[server] starting on port {port}");
                }
            }
            EventKind::ServerReady => {
                if let Some(port) = e.port {
                    println!("[server] ready on port {port}");
                }
            }
            EventKind::ServerRestarting => {
                if let Some(port) = e.port {
                    println!("[server] restarting on port {port}");
                }
            }
            EventKind::ServerStopped => {
                if let Some(port) = e.port {
                    println!("[server] stopped on port {port}");
                }
            }
            EventKind::BrowserReady => {
                println!("[browser] ready");
            }
            EventKind::RouteStarting => {
                if let (Some(route), Some(i), Some(n)) = (&e.route, e.index, e.total) {
                    match e.eta_ms {
                        Some(eta) => println!("[{i}/{n}] {route} (eta {})", fmt_millis(eta)),
                        None => println!("[{i}/{n}] {route}"),
                    }
                }
            }
            EventKind::RouteRendered => {
                if let (Some(path), Some(bytes), Some(ms)) = (&e.path, e.bytes, e.duration_ms) {
                    println!("  saved {path} ({} in {ms} ms)", fmt_bytes(bytes));
                }
            }
            EventKind::RouteSkipped => {
                if let (Some(route), Some(i), Some(n)) = (&e.route, e.index, e.total) {
                    println!("[{i}/{n}] {route} skipped (exists)");
                }
            }
            EventKind::RenderFailed => {
                if let Some(reason) = &e.reason {
                    println!("[error] {reason}");
                }
            }
            EventKind::ShutdownRequested => {
                println!("[shutdown] interrupt received, tearing down");
            }
            EventKind::TeardownComplete => {
                println!("[shutdown] teardown complete");
            }
        }
    }

    fn name(&self) -> &'static str {
        "progress"
    }
}

/// Formats milliseconds as `850ms`, `12s` or `1m42s`.
fn fmt_millis(ms: u64) -> String {
    if ms < 1_000 {
        format!("{ms}ms")
    } else if ms < 60_000 {
        format!("{}s", ms / 1_000)
    } else {
        format!("{}m{:02}s", ms / 60_000, (ms % 60_000) / 1_000)
    }
}

/// Formats a byte count as `512 B`, `45.1 KiB` or `1.2 MiB`.
fn fmt_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = 1024.0 * 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{bytes} B")
    } else if b < MIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{:.1} MiB", b / MIB)
    }
}
