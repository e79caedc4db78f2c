//! # Non-blocking event fan-out to multiple subscribers.
//!
//! [`SubscriberSet`] connects the broadcast [`Bus`] to a group of
//! [`Subscribe`] implementations:
//!
//! ```text
//! Bus ──► listener ──► [queue 1] ──► worker 1 ──► subscriber1.on_event()
//!              │       (bounded)
//!              └─────► [queue N] ──► worker N ──► subscriberN.on_event()
//!                      (bounded)
//! ```
//!
//! ## Rules
//! - **Per-subscriber FIFO**: each subscriber sees events in publish order.
//! - **Isolation**: a slow subscriber only loses its own events (queue
//!   overflow drops with a warning); others are unaffected.
//! - **Non-blocking**: during the session delivery uses `try_send`; the
//!   publisher never waits.
//! - **Lossless shutdown**: [`shutdown`](SubscriberSet::shutdown) tells the
//!   listener to drain everything still buffered in the bus, waiting on
//!   full queues this time, then awaits every worker. Events published
//!   before the shutdown call are delivered, not dropped.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::{Bus, Event};
use crate::subscribers::Subscribe;

/// Per-subscriber channel metadata.
struct Channel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Fan-out coordinator for event subscribers.
pub struct SubscriberSet {
    close: CancellationToken,
    listener: JoinHandle<()>,
    workers: Vec<JoinHandle<()>>,
}

impl SubscriberSet {
    /// Attaches the subscribers to the bus.
    ///
    /// Spawns one bounded-queue worker per subscriber plus a listener task
    /// that forwards bus events into every queue. Workers run until
    /// [`shutdown`](Self::shutdown).
    #[must_use]
    pub fn attach(bus: &Bus, subs: Vec<Arc<dyn Subscribe>>) -> Self {
        let mut channels = Vec::with_capacity(subs.len());
        let mut workers = Vec::with_capacity(subs.len());

        for sub in subs {
            let cap = sub.queue_capacity().max(1);
            let name = sub.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    sub.on_event(ev.as_ref()).await;
                }
            });
            channels.push(Channel { name, sender: tx });
            workers.push(handle);
        }

        let close = CancellationToken::new();
        let stop = close.clone();
        let mut rx = bus.subscribe();
        let listener = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = stop.cancelled() => {
                        drain(&mut rx, &channels).await;
                        break;
                    }
                    recv = rx.recv() => match recv {
                        Ok(ev) => forward(&channels, Arc::new(ev)),
                        Err(broadcast::error::RecvError::Lagged(n)) => {
                            tracing::warn!(skipped = n, "event listener lagged behind the bus");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            }
            // Dropping the channels here closes every worker queue.
        });

        Self {
            close,
            listener,
            workers,
        }
    }

    /// Shuts down the fan-out.
    ///
    /// Signals the listener, which drains the remaining bus backlog into
    /// the subscriber queues and exits (dropping the queue senders with
    /// it), then awaits every worker so already-queued events are still
    /// delivered.
    pub async fn shutdown(self) {
        self.close.cancel();
        let _ = self.listener.await;

        for handle in self.workers {
            let _ = handle.await;
        }
    }
}

/// Session-time delivery: never waits, drops on a full queue.
fn forward(channels: &[Channel], ev: Arc<Event>) {
    for channel in channels {
        match channel.sender.try_send(Arc::clone(&ev)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(
                    subscriber = channel.name,
                    "subscriber queue full, event dropped"
                );
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {}
        }
    }
}

/// Shutdown-time delivery: empties the bus backlog, waiting on full queues.
/// The session is already over, so blocking the listener is harmless.
async fn drain(rx: &mut broadcast::Receiver<Event>, channels: &[Channel]) {
    loop {
        match rx.try_recv() {
            Ok(ev) => {
                let ev = Arc::new(ev);
                for channel in channels {
                    let _ = channel.sender.send(Arc::clone(&ev)).await;
                }
            }
            Err(broadcast::error::TryRecvError::Lagged(n)) => {
                tracing::warn!(skipped = n, "event listener lagged behind the bus");
            }
            Err(broadcast::error::TryRecvError::Empty)
            | Err(broadcast::error::TryRecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(Arc<AtomicUsize>);

    #[async_trait::async_trait]
    impl Subscribe for Counting {
        async fn on_event(&self, _event: &Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_events_reach_every_subscriber() {
        let bus = Bus::new(16);
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));
        let set = SubscriberSet::attach(
            &bus,
            vec![
                Arc::new(Counting(Arc::clone(&a))),
                Arc::new(Counting(Arc::clone(&b))),
            ],
        );

        bus.publish(Event::new(EventKind::RouteStarting));
        bus.publish(Event::new(EventKind::RouteRendered));
        set.shutdown().await;

        assert_eq!(a.load(Ordering::SeqCst), 2);
        assert_eq!(b.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_shutdown_delivers_the_queued_backlog() {
        // A large backlog published right before shutdown; every event must
        // still reach the subscriber, not just whatever one listener poll
        // happens to forward.
        let total = 10_000usize;
        let bus = Bus::new(16_384);
        let count = Arc::new(AtomicUsize::new(0));
        let set = SubscriberSet::attach(&bus, vec![Arc::new(Counting(Arc::clone(&count)))]);

        for _ in 0..total {
            bus.publish(Event::new(EventKind::RouteRendered));
        }
        set.shutdown().await;

        assert_eq!(count.load(Ordering::SeqCst), total);
    }
}
