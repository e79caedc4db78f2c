//! Session core: orchestration and process lifecycle.
//!
//! The entry point is [`RouteRenderer`], which drives one render session end
//! to end. Internal wiring:
//!
//! - [`port`]: bounded-range probe for an unused local TCP port;
//! - [`server`]: static-file-server child supervision (spawn in its own
//!   process group, liveness probing, graduated stop, restart in place);
//! - [`browser`]: one headless Chrome and one reusable page;
//! - [`navigate`]: the seam trait between the loop and the browser;
//! - [`renderer`]: the sequential route loop with skip/ETA/restart logic;
//! - [`session`]: live handles and exactly-once teardown;
//! - [`progress`]: processed-count and remaining-time estimation;
//! - [`output`]: route-to-path mapping and page persistence;
//! - [`shutdown`]: cross-platform interrupt/terminate signal waiting.

mod browser;
mod navigate;
mod output;
mod port;
mod progress;
mod renderer;
mod server;
mod session;
mod shutdown;

pub use browser::BrowserSession;
pub use navigate::Navigate;
pub use output::output_path;
pub use port::allocate_port;
pub use progress::RenderProgress;
pub use renderer::{Outcome, RouteRenderer};
pub use server::{Serve, ServerSupervisor};
pub use session::{LiveSession, Teardown};
pub use shutdown::wait_for_shutdown_signal;
