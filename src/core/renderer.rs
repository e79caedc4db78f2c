//! # Sequential route rendering.
//!
//! [`RouteRenderer`] drives one render session end to end:
//!
//! ```text
//! allocate port ─► start server ─► launch browser ─► route loop ─► teardown
//!                                                       │
//!                                      interrupt ───────┴─► force teardown
//! ```
//!
//! ## Rules
//! - Routes render **sequentially, in input order**, through one reusable
//!   page. There is no per-route parallelism.
//! - A route whose output file already exists is skipped when resume mode is
//!   on; the skip check reads the filesystem at loop time, so a duplicate
//!   route later in the same run is also skipped.
//! - The server is recycled after every N **rendered** routes; skipped
//!   routes do not advance the cadence, and the recycle fires only right
//!   before a route that will actually render.
//! - The first unrecoverable failure aborts the run. Teardown still
//!   executes before the error reaches the caller.
//! - An interrupt is a clean abort: the loop is dropped wherever it is,
//!   teardown is forced, and the outcome is [`Outcome::Interrupted`].

use std::path::PathBuf;
use std::time::Instant;

use tokio_util::sync::CancellationToken;

use crate::config::{RenderRequest, SessionConfig};
use crate::core::browser::BrowserSession;
use crate::core::output::{output_path, write_page};
use crate::core::port::allocate_port;
use crate::core::progress::RenderProgress;
use crate::core::server::ServerSupervisor;
use crate::core::session::{LiveSession, Teardown};
use crate::error::PrerenderError;
use crate::events::{Bus, Event, EventKind};

/// How a render session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every route was processed.
    Completed {
        /// Routes actually rendered.
        rendered: usize,
        /// Routes elided because their output already existed.
        skipped: usize,
    },
    /// An external interrupt aborted the run mid-way.
    Interrupted,
}

/// One-shot orchestrator for a render session.
pub struct RouteRenderer {
    request: RenderRequest,
    config: SessionConfig,
    bus: Bus,
}

impl RouteRenderer {
    pub fn new(request: RenderRequest, config: SessionConfig, bus: Bus) -> Self {
        Self {
            request,
            config,
            bus,
        }
    }

    /// Runs the full session: startup, route loop, teardown.
    ///
    /// Cancelling `cancel` at any point aborts the run cleanly and returns
    /// [`Outcome::Interrupted`].
    pub async fn run(&self, cancel: CancellationToken) -> Result<Outcome, PrerenderError> {
        self.run_session(LiveSession::new(), cancel).await
    }

    /// Runs the session over explicitly prepared handles.
    ///
    /// Startup only creates the pieces `live` is missing, so a caller can
    /// pre-install its own [`Serve`](crate::Serve) or
    /// [`Navigate`](crate::Navigate) implementation.
    pub async fn run_session(
        &self,
        mut live: LiveSession,
        cancel: CancellationToken,
    ) -> Result<Outcome, PrerenderError> {
        let driven = tokio::select! {
            res = self.drive(&mut live) => Some(res),
            _ = cancel.cancelled() => None,
        };

        match driven {
            None => {
                self.bus.publish(Event::new(EventKind::ShutdownRequested));
                self.finish(&mut live, Teardown::Force).await;
                Ok(Outcome::Interrupted)
            }
            Some(Ok(outcome)) => {
                self.finish(&mut live, Teardown::Graceful).await;
                Ok(outcome)
            }
            Some(Err(e)) => {
                self.bus
                    .publish(Event::new(EventKind::RenderFailed).with_reason(e.to_string()));
                self.finish(&mut live, Teardown::Force).await;
                Err(e)
            }
        }
    }

    /// Tears the session down and publishes the closing events.
    async fn finish(&self, live: &mut LiveSession, mode: Teardown) {
        let port = live.port();
        live.teardown(mode).await;
        if let Some(port) = port {
            self.bus
                .publish(Event::new(EventKind::ServerStopped).with_port(port));
        }
        self.bus.publish(Event::new(EventKind::TeardownComplete));
    }

    /// Brings up whatever `live` is missing, then runs the route loop.
    async fn drive(&self, live: &mut LiveSession) -> Result<Outcome, PrerenderError> {
        if live.server.is_none() {
            let port = allocate_port(self.config.start_port).await?;
            live.port = Some(port);
            self.bus
                .publish(Event::new(EventKind::ServerStarting).with_port(port));

            let server = ServerSupervisor::start(port, &self.request.serve_dir, &self.config).await?;
            live.server = Some(Box::new(server));
            self.bus
                .publish(Event::new(EventKind::ServerReady).with_port(port));
        }

        if live.browser.is_none() {
            let browser = BrowserSession::launch(self.config.settle).await?;
            live.browser = Some(Box::new(browser));
            self.bus.publish(Event::new(EventKind::BrowserReady));
        }

        self.render_routes(live).await
    }

    /// The sequential route loop.
    async fn render_routes(&self, live: &mut LiveSession) -> Result<Outcome, PrerenderError> {
        let Some(server) = live.server.as_mut() else {
            return Err(PrerenderError::ServerSpawn {
                source: std::io::Error::other("session has no server attached"),
            });
        };
        let Some(browser) = live.browser.as_mut() else {
            return Err(PrerenderError::BrowserLaunch {
                reason: "session has no browser attached".into(),
            });
        };

        let routes = &self.request.routes;
        let total = routes.len();
        let cadence = self.config.restart_cadence();
        let mut progress = RenderProgress::new();
        let mut rendered_since_restart = 0usize;

        // Snapshot which targets pre-exist so the remaining-work count for
        // the ETA is O(1) per route. The skip decision itself stays live.
        let plan: Vec<(PathBuf, bool)> = routes
            .iter()
            .map(|route| {
                let target = output_path(&self.request.out_dir, route, self.request.flat_output);
                let pre_existing = target.exists();
                (target, pre_existing)
            })
            .collect();
        let mut renders_from = vec![0usize; total + 1];
        for idx in (0..total).rev() {
            let renders = !(self.request.skip_existing && plan[idx].1);
            renders_from[idx] = renders_from[idx + 1] + usize::from(renders);
        }

        for (idx, route) in routes.iter().enumerate() {
            let index = idx + 1;
            let (target, _) = &plan[idx];
            let shown_path = target
                .strip_prefix(&self.request.out_dir)
                .unwrap_or(target)
                .display()
                .to_string();

            if self.request.skip_existing && target.exists() {
                progress.mark_skipped();
                self.bus.publish(
                    Event::new(EventKind::RouteSkipped)
                        .with_route(route.as_str())
                        .with_path(shown_path)
                        .with_index(index, total),
                );
                continue;
            }

            // Recycle only right before a route that will render, so skips
            // never trigger a restart.
            if let Some(every) = cadence {
                if rendered_since_restart >= every {
                    self.bus.publish(
                        Event::new(EventKind::ServerRestarting)
                            .with_port(server.port())
                            .with_index(index, total),
                    );
                    server.restart().await?;
                    rendered_since_restart = 0;
                }
            }

            progress.mark_render_started();
            let mut starting = Event::new(EventKind::RouteStarting)
                .with_route(route.as_str())
                .with_index(index, total);
            if let Some(eta) = progress.eta(renders_from[idx]) {
                starting = starting.with_eta(eta);
            }
            self.bus.publish(starting);

            let url = format!("http://localhost:{}{route}", server.port());
            let begun = Instant::now();
            let html = browser.goto(&url, self.config.navigation_timeout).await?;
            write_page(target, &html).await?;

            progress.mark_rendered();
            rendered_since_restart += 1;
            self.bus.publish(
                Event::new(EventKind::RouteRendered)
                    .with_route(route.as_str())
                    .with_path(shown_path)
                    .with_index(index, total)
                    .with_duration(begun.elapsed())
                    .with_bytes(html.len() as u64),
            );
        }

        Ok(Outcome::Completed {
            rendered: progress.rendered(),
            skipped: progress.skipped(),
        })
    }
}
