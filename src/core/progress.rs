//! # Render-pace tracking and remaining-time estimation.
//!
//! [`RenderProgress`] counts rendered and skipped routes and estimates the
//! remaining time from the average pace of actual renders.
//!
//! ## Rules
//! - The clock starts **lazily** at the first real render, so a long prefix
//!   of skipped routes does not dilute the average.
//! - The estimate multiplies the per-render average by the number of routes
//!   that will actually render, not by the raw remaining count.
//! - With zero renders recorded there is no estimate.

use std::time::{Duration, Instant};

/// Mutable pace state for one render session.
#[derive(Debug, Default)]
pub struct RenderProgress {
    started_at: Option<Instant>,
    rendered: usize,
    skipped: usize,
}

impl RenderProgress {
    /// Creates an empty tracker. The clock is not running yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a route render is about to begin, starting the clock if
    /// this is the first one.
    pub fn mark_render_started(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    /// Records one completed render.
    pub fn mark_rendered(&mut self) {
        self.rendered += 1;
    }

    /// Records one skipped route.
    pub fn mark_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Number of routes rendered so far.
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    /// Number of routes skipped so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Estimates the remaining time given how many routes will still
    /// actually render.
    ///
    /// `None` until at least one render completed.
    pub fn eta(&self, remaining_renders: usize) -> Option<Duration> {
        let started_at = self.started_at?;
        estimate(started_at.elapsed(), self.rendered, remaining_renders)
    }
}

/// Pure estimation core: `elapsed / rendered * remaining`.
fn estimate(elapsed: Duration, rendered: usize, remaining: usize) -> Option<Duration> {
    if rendered == 0 {
        return None;
    }
    let avg = elapsed / rendered as u32;
    Some(avg * remaining as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_estimate_before_first_render() {
        let progress = RenderProgress::new();
        assert!(progress.eta(10).is_none());

        assert!(estimate(Duration::from_secs(5), 0, 10).is_none());
    }

    #[test]
    fn test_estimate_scales_with_remaining() {
        // 4 renders in 8 seconds → 2s average.
        let eta = estimate(Duration::from_secs(8), 4, 3).unwrap();
        assert_eq!(eta, Duration::from_secs(6));

        let eta = estimate(Duration::from_secs(8), 4, 0).unwrap();
        assert_eq!(eta, Duration::ZERO);
    }

    #[test]
    fn test_counts_are_independent() {
        let mut progress = RenderProgress::new();
        progress.mark_skipped();
        progress.mark_skipped();
        progress.mark_render_started();
        progress.mark_rendered();
        assert_eq!(progress.rendered(), 1);
        assert_eq!(progress.skipped(), 2);
    }

    #[test]
    fn test_clock_starts_on_first_render_only() {
        let mut progress = RenderProgress::new();
        progress.mark_skipped();
        assert!(progress.eta(5).is_none());

        progress.mark_render_started();
        progress.mark_rendered();
        assert!(progress.eta(5).is_some());
    }
}
