#![forbid(unsafe_code)]

//! "More content below" affordance for scrollable overlay content.
//!
//! The affordance is shown iff the content overflows its container and the
//! user is not within `threshold` pixels of the bottom.
//!
//! Recomputed on:
//! - first measurement after mount, once a settle delay has let layout finish,
//! - every content scroll,
//! - every viewport resize, and every content re-measure after settling.

use core::time::Duration;

use berth_core::geometry::ScrollMetrics;
use berth_runtime::timer::Timer;

/// Whether the content is taller than its container.
#[inline]
#[must_use]
pub fn overflows(metrics: &ScrollMetrics) -> bool {
    metrics.scroll_height > metrics.client_height
}

/// Whether the visible region ends within `threshold` pixels of the content end.
#[inline]
#[must_use]
pub fn is_near_bottom(metrics: &ScrollMetrics, threshold: f64) -> bool {
    metrics.scroll_top + metrics.client_height >= metrics.scroll_height - threshold
}

/// Whether the "scroll for more" affordance should be visible.
#[inline]
#[must_use]
pub fn needs_affordance(metrics: &ScrollMetrics, threshold: f64) -> bool {
    overflows(metrics) && !is_near_bottom(metrics, threshold)
}

/// Stateful affordance tracker for one overlay's content region.
#[derive(Debug, Clone)]
pub struct ScrollIndicator {
    threshold: f64,
    settle_delay: Duration,
    settle: Timer<()>,
    settled: bool,
    metrics: Option<ScrollMetrics>,
    show: bool,
}

impl ScrollIndicator {
    /// Create an indicator with the given near-bottom threshold and settle delay.
    #[must_use]
    pub fn new(threshold: f64, settle_delay: Duration) -> Self {
        Self {
            threshold,
            settle_delay,
            settle: Timer::new(),
            settled: false,
            metrics: None,
            show: false,
        }
    }

    /// Whether the affordance is currently shown.
    #[inline]
    #[must_use]
    pub fn show_affordance(&self) -> bool {
        self.show
    }

    /// Last known content geometry.
    #[must_use]
    pub fn metrics(&self) -> Option<ScrollMetrics> {
        self.metrics
    }

    /// Whether the post-mount settle delay has elapsed.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Pending settle deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.settle.deadline()
    }

    /// Overlay content was inserted; measure once layout settles.
    pub fn on_mount(&mut self, now: Duration) {
        self.settled = false;
        self.show = false;
        self.metrics = None;
        self.settle.arm(now, self.settle_delay, ());
    }

    /// Overlay content was removed.
    pub fn reset(&mut self) {
        self.settle.cancel();
        self.settled = false;
        self.show = false;
        self.metrics = None;
    }

    /// Content was measured (layout pass). Returns `true` if the affordance
    /// flipped. Before the settle delay the measurement is only stored.
    pub fn on_measure(&mut self, metrics: ScrollMetrics) -> bool {
        self.metrics = Some(metrics);
        if self.settled { self.recompute() } else { false }
    }

    /// Content scrolled. Returns `true` if the affordance flipped.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        self.metrics = Some(metrics);
        self.recompute()
    }

    /// Viewport resized. Returns `true` if the affordance flipped.
    pub fn on_resize(&mut self) -> bool {
        self.recompute()
    }

    /// Fire the settle timer if due. Returns `true` if the affordance flipped.
    pub fn poll(&mut self, now: Duration) -> bool {
        if self.settle.fire_due(now).is_some() {
            self.settled = true;
            self.recompute()
        } else {
            false
        }
    }

    fn recompute(&mut self) -> bool {
        let show = self
            .metrics
            .as_ref()
            .is_some_and(|m| needs_affordance(m, self.threshold));
        let changed = show != self.show;
        self.show = show;
        changed
    }
}

impl Default for ScrollIndicator {
    fn default() -> Self {
        Self::new(10.0, Duration::from_millis(100))
    }
}
