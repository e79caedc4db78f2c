//! Runtime events: types and broadcast bus.
//!
//! The event **data model** and the **bus** used to publish/subscribe to
//! events emitted by the render session (server supervisor, browser session,
//! route loop, teardown).
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! Publisher: `RouteRenderer`. Consumer: the listener spawned by
//! `SubscriberSet::attach`, which fans events out to subscribers such as
//! the stdout `ProgressWriter`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
