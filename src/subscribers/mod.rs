//! # Event subscribers for the render session.
//!
//! The [`Subscribe`] trait is the extension point for reacting to session
//! events (progress printing, metrics, custom reporters). A
//! [`SubscriberSet`] attaches a group of subscribers to the event
//! [`Bus`](crate::Bus) and drives each one from a dedicated worker with a
//! bounded queue, so a slow subscriber never blocks the render loop.
//!
//! [`ProgressWriter`] is the built-in subscriber producing the human-readable
//! progress lines on stdout.

mod progress;
mod set;
mod subscribe;

pub use progress::ProgressWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
