//! # Runtime events emitted by the render session.
//!
//! [`EventKind`] classifies what happened; [`Event`] carries the metadata a
//! reporter needs to print one progress line: route, index/total, timing,
//! output size, ETA. Events are advisory only; nothing in the session reads
//! them back.
//!
//! Each event gets a globally unique, monotonically increasing `seq`, so
//! subscribers that process events concurrently can restore publish order.
//!
//! ## Example
//! ```rust
//! use prerender::{Event, EventKind};
//! use std::time::Duration;
//!
//! let ev = Event::new(EventKind::RouteRendered)
//!     .with_route("/about")
//!     .with_index(2, 14)
//!     .with_duration(Duration::from_millis(840))
//!     .with_bytes(46_231);
//!
//! assert_eq!(ev.kind, EventKind::RouteRendered);
//! assert_eq!(ev.route.as_deref(), Some("/about"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of render-session events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Server lifecycle ===
    /// Static-server child spawned; liveness probing begins. Sets `port`.
    ServerStarting,
    /// Liveness probe answered; the origin is usable. Sets `port`.
    ServerReady,
    /// Periodic recycle at a route-loop boundary. Sets `port`, `index`.
    ServerRestarting,
    /// Graduated stop completed (including port reclamation). Sets `port`.
    ServerStopped,

    // === Browser lifecycle ===
    /// Headless browser launched and its reusable page is open.
    BrowserReady,

    // === Route loop ===
    /// A route is about to be navigated.
    ///
    /// Sets `route`, `index`/`total`, and `eta_ms` once at least one route
    /// has been rendered.
    RouteStarting,
    /// A route was rendered and persisted.
    ///
    /// Sets `route`, `path`, `duration_ms`, `bytes`, `index`/`total`.
    RouteRendered,
    /// A route was elided because its output file already exists.
    /// Sets `route`, `path`, `index`/`total`.
    RouteSkipped,
    /// The run is aborting on its first unrecoverable failure. Sets `reason`.
    RenderFailed,

    // === Shutdown ===
    /// External interrupt observed; the session is being force-terminated.
    ShutdownRequested,
    /// Teardown (server stop + browser close) finished.
    TeardownComplete,
}

/// Render-session event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Route this event refers to, if any.
    pub route: Option<Arc<str>>,
    /// Output path (relative to the output directory) for rendered/skipped
    /// routes.
    pub path: Option<Arc<str>>,
    /// 1-based position of the route in the input list.
    pub index: Option<u32>,
    /// Total number of routes in the input list.
    pub total: Option<u32>,
    /// Per-route render duration in milliseconds.
    pub duration_ms: Option<u64>,
    /// Output size in bytes.
    pub bytes: Option<u64>,
    /// Estimated remaining time in milliseconds.
    pub eta_ms: Option<u64>,
    /// Port of the supervised static server.
    pub port: Option<u16>,
    /// Human-readable reason (failures, diagnostics).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// the next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            route: None,
            path: None,
            index: None,
            total: None,
            duration_ms: None,
            bytes: None,
            eta_ms: None,
            port: None,
            reason: None,
        }
    }

    /// Attaches the route string.
    #[inline]
    pub fn with_route(mut self, route: impl Into<Arc<str>>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Attaches the output path.
    #[inline]
    pub fn with_path(mut self, path: impl Into<Arc<str>>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attaches the 1-based route index and the list total.
    #[inline]
    pub fn with_index(mut self, index: usize, total: usize) -> Self {
        self.index = Some(index.min(u32::MAX as usize) as u32);
        self.total = Some(total.min(u32::MAX as usize) as u32);
        self
    }

    /// Attaches a per-route duration (stored as milliseconds).
    #[inline]
    pub fn with_duration(mut self, d: Duration) -> Self {
        self.duration_ms = Some(d.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    /// Attaches the output size in bytes.
    #[inline]
    pub fn with_bytes(mut self, bytes: u64) -> Self {
        self.bytes = Some(bytes);
        self
    }

    /// Attaches a remaining-time estimate (stored as milliseconds).
    #[inline]
    pub fn with_eta(mut self, d: Duration) -> Self {
        self.eta_ms = Some(d.as_millis().min(u128::from(u64::MAX)) as u64);
        self
    }

    /// Attaches the server port.
    #[inline]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::RouteStarting);
        let b = Event::new(EventKind::RouteRendered);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_set_fields() {
        let ev = Event::new(EventKind::RouteSkipped)
            .with_route("/about")
            .with_path("about/index.html")
            .with_index(3, 10);
        assert_eq!(ev.route.as_deref(), Some("/about"));
        assert_eq!(ev.path.as_deref(), Some("about/index.html"));
        assert_eq!(ev.index, Some(3));
        assert_eq!(ev.total, Some(10));
    }
}
