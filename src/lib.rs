//! # prerender
//!
//! **prerender** turns a set of client-rendered web routes into static HTML
//! files by driving a real headless browser against a locally served build,
//! one route at a time, and persisting the fully rendered DOM to disk.
//!
//! It exists for site owners who need crawlable static output from a
//! single-page application without maintaining a server-side rendering stack.
//!
//! ## Architecture
//! ```text
//!     ┌───────────────┐
//!     │ RenderRequest │  routes, out_dir, serve_dir, flat_output, skip_existing
//!     └───────┬───────┘
//!             ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ RouteRenderer (session orchestrator)                            │
//! │  - allocate_port()          probe a bounded local port range    │
//! │  - ServerSupervisor         static-server child in its own      │
//! │                             process group, liveness-probed,     │
//! │                             restarted every N rendered routes   │
//! │  - BrowserSession           one headless Chrome + one page,     │
//! │                             reused across all routes            │
//! │  - LiveSession              exactly-once teardown on every exit │
//! └──────┬──────────────────────────────────────────┬───────────────┘
//!        │ publishes                                │ raced against
//!        ▼                                          ▼
//! ┌──────────────────┐                  ┌──────────────────────────┐
//! │ Bus (broadcast)  │                  │ CancellationToken        │
//! └──────┬───────────┘                  │ (cancelled by the signal │
//!        ▼                              │  listener on SIGINT/TERM)│
//! ┌──────────────────┐                  └──────────────────────────┘
//! │ SubscriberSet    │
//! │  └─ ProgressWriter (stdout progress lines, ETA)                 │
//! └──────────────────┘
//! ```
//!
//! ## Lifecycle
//! ```text
//! run(request, cancel):
//!   ├─► allocate_port(start_port)                 → NoPortAvailable if exhausted
//!   ├─► ServerSupervisor::start(serve_dir, port)  → probe HTTP root until ready
//!   ├─► BrowserSession::launch()                  → sandbox-disabled Chrome
//!   ├─► for route in routes (input order):
//!   │     ├─ skip if skip_existing and the target file exists
//!   │     ├─ restart the server before the 1001st, 2001st, ... render
//!   │     ├─ navigate http://localhost:<port><route>, wait for quiescence
//!   │     └─ write serialized document to the deterministic output path
//!   └─► teardown (always, exactly once):
//!         browser close (graceful) or kill (interrupt), then graduated
//!         server stop: group SIGTERM → bounded wait → port reclamation
//! ```
//!
//! An external interrupt cancels the token, abandons any in-flight
//! navigation, force-kills both child processes, and is reported as a
//! deliberate clean abort rather than an error.
//!
//! ## Example
//! ```no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use prerender::{
//!     Bus, ProgressWriter, RenderRequest, RouteRenderer, SessionConfig, Subscribe,
//!     SubscriberSet,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = SessionConfig::default();
//!     let bus = Bus::new(cfg.bus_capacity);
//!
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(ProgressWriter)];
//!     let set = SubscriberSet::attach(&bus, subs);
//!
//!     let request = RenderRequest {
//!         routes: vec!["/".into(), "/about".into()],
//!         out_dir: std::env::current_dir()?.join("static-pages"),
//!         serve_dir: std::env::current_dir()?.join("build"),
//!         flat_output: false,
//!         skip_existing: false,
//!     };
//!
//!     let cancel = CancellationToken::new();
//!     let renderer = RouteRenderer::new(request, cfg, bus);
//!     renderer.run(cancel).await?;
//!     set.shutdown().await;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
pub mod input;
mod subscribers;

// ---- Public re-exports ----

pub use config::{RenderRequest, SessionConfig};
pub use core::{
    allocate_port, output_path, wait_for_shutdown_signal, BrowserSession, LiveSession, Navigate,
    Outcome, RenderProgress, RouteRenderer, Serve, ServerSupervisor, Teardown,
};
pub use error::{PrerenderError, SetupError};
pub use events::{Bus, Event, EventKind};
pub use subscribers::{ProgressWriter, Subscribe, SubscriberSet};
