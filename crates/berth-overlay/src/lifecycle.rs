#![forbid(unsafe_code)]

//! Overlay lifecycle state machine.
//!
//! Drives one overlay through four states in step with a CSS transition:
//!
//! ```text
//!              request_open                 open_delay elapsed
//!  Unmounted ───────────────▶ Mounting ───────────────────────▶ Visible
//!      ▲                       ▲    │                              │
//!      │ transition elapsed    │    │ request_close                │ request_close
//!      │                       │    ▼                              │
//!      └───────────────── Dismissing ◀─────────────────────────────┘
//!                          request_open (back to Mounting)
//! ```
//!
//! `teardown` forces `Unmounted` from any state.
//!
//! # Invariants
//!
//! 1. The node is inserted on entering `Mounting` with the animated property
//!    at its hidden value; `Visible` is reached no earlier than the open
//!    delay later, so the hidden frame is always painted first.
//! 2. The node stays mounted for the full transition after a close request.
//! 3. Every transition cancels the pending timer before arming a new one, so
//!    at most one deadline is ever pending and a stale timer never fires.
//! 4. Requests that make no sense in the current state (close while
//!    unmounted, open while visible) are silent no-ops.
//!
//! The reveal and unmount timers share one [`Timer`] slot: they are mutually
//! exclusive by construction rather than by bookkeeping.

use core::time::Duration;

use berth_core::config::OverlayConfig;
use berth_runtime::timer::{Timer, TimerToken};

/// Lifecycle state of one overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverlayState {
    /// Not in the document.
    #[default]
    Unmounted,
    /// In the document, animated property at its hidden value.
    Mounting,
    /// In the document, animated property at its shown value.
    Visible,
    /// In the document, animating back to hidden before removal.
    Dismissing,
}

impl OverlayState {
    /// Whether the overlay node is in the document.
    #[inline]
    #[must_use]
    pub const fn is_mounted(self) -> bool {
        !matches!(self, Self::Unmounted)
    }

    /// Whether the animated property is at its shown value.
    #[inline]
    #[must_use]
    pub const fn is_shown(self) -> bool {
        matches!(self, Self::Visible)
    }

    /// Whether the overlay is opening or open (the latest intent was "open").
    #[inline]
    #[must_use]
    pub const fn is_open_intent(self) -> bool {
        matches!(self, Self::Mounting | Self::Visible)
    }

    /// Short label for logs and traces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unmounted => "unmounted",
            Self::Mounting => "mounting",
            Self::Visible => "visible",
            Self::Dismissing => "dismissing",
        }
    }
}

impl std::fmt::Display for OverlayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state change, stamped with the host time it happened at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LifecycleChange {
    /// State before.
    pub from: OverlayState,
    /// State after.
    pub to: OverlayState,
    /// Host time of the change.
    pub at: Duration,
}

/// Timer lengths for one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleTimings {
    /// Delay from insertion to reveal.
    pub open_delay: Duration,
    /// Delay from close request to removal.
    pub exit: Duration,
}

impl LifecycleTimings {
    /// Shortest open delay. Guarantees that reveal never happens in the same
    /// host step as insertion, even when configured to zero.
    pub const MIN_OPEN_DELAY: Duration = Duration::from_millis(1);

    /// Create timings, raising `open_delay` to [`Self::MIN_OPEN_DELAY`].
    #[must_use]
    pub fn new(open_delay: Duration, exit: Duration) -> Self {
        Self {
            open_delay: open_delay.max(Self::MIN_OPEN_DELAY),
            exit,
        }
    }

    /// Timings from presentation options (reduced motion shortens the exit).
    #[must_use]
    pub fn from_config(config: &OverlayConfig) -> Self {
        Self::new(config.open_delay, config.effective_transition())
    }
}

impl Default for LifecycleTimings {
    fn default() -> Self {
        Self::from_config(&OverlayConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Reveal,
    Unmount,
}

/// The overlay lifecycle state machine.
///
/// Pure bookkeeping: it never touches the document. Callers apply the side
/// effects of each returned [`LifecycleChange`].
#[derive(Debug, Clone)]
pub struct LifecycleController {
    state: OverlayState,
    timer: Timer<Step>,
    timings: LifecycleTimings,
    since: Duration,
    transitions: u64,
}

impl LifecycleController {
    /// Create an unmounted controller.
    #[must_use]
    pub fn new(timings: LifecycleTimings) -> Self {
        Self {
            state: OverlayState::Unmounted,
            timer: Timer::new(),
            timings,
            since: Duration::ZERO,
            transitions: 0,
        }
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Configured timings.
    #[must_use]
    pub fn timings(&self) -> LifecycleTimings {
        self.timings
    }

    /// Host time of the last state change.
    #[must_use]
    pub fn since(&self) -> Duration {
        self.since
    }

    /// Total state changes so far (diagnostic).
    #[must_use]
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Pending timer deadline, for scheduling the next host wakeup.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timer.deadline()
    }

    /// Token for the pending timer, for hosts that schedule real callbacks.
    #[must_use]
    pub fn pending_token(&self) -> Option<TimerToken> {
        self.timer.token()
    }

    /// Ask for the overlay to open.
    ///
    /// From `Unmounted` the node is inserted (`Mounting`). From `Dismissing`
    /// the exit is abandoned and the reveal re-armed. Otherwise a no-op.
    pub fn request_open(&mut self, now: Duration) -> Option<LifecycleChange> {
        match self.state {
            OverlayState::Unmounted | OverlayState::Dismissing => {
                let change = self.transition(OverlayState::Mounting, now);
                self.timer.arm(now, self.timings.open_delay, Step::Reveal);
                Some(change)
            }
            OverlayState::Mounting | OverlayState::Visible => {
                berth_core::trace!(state = %self.state, "open request ignored");
                None
            }
        }
    }

    /// Ask for the overlay to close.
    ///
    /// From `Mounting` or `Visible` the property flips back to hidden at once
    /// and removal is scheduled after the exit transition. Otherwise a no-op.
    pub fn request_close(&mut self, now: Duration) -> Option<LifecycleChange> {
        match self.state {
            OverlayState::Mounting | OverlayState::Visible => {
                let change = self.transition(OverlayState::Dismissing, now);
                self.timer.arm(now, self.timings.exit, Step::Unmount);
                Some(change)
            }
            OverlayState::Unmounted | OverlayState::Dismissing => {
                berth_core::trace!(state = %self.state, "close request ignored");
                None
            }
        }
    }

    /// Drive from an external boolean ("is open" prop).
    pub fn set_open(&mut self, open: bool, now: Duration) -> Option<LifecycleChange> {
        if open {
            self.request_open(now)
        } else {
            self.request_close(now)
        }
    }

    /// Fire the pending timer if it is due at `now`.
    pub fn poll(&mut self, now: Duration) -> Option<LifecycleChange> {
        let step = self.timer.fire_due(now)?;
        self.complete(step, now)
    }

    /// Fire the pending timer from a host callback. Stale tokens are ignored.
    pub fn on_timer(&mut self, token: TimerToken, now: Duration) -> Option<LifecycleChange> {
        match self.timer.take_if_current(token) {
            Some(step) => self.complete(step, now),
            None => {
                berth_core::trace!(generation = token.generation(), "stale timer ignored");
                None
            }
        }
    }

    /// Force the overlay out of the document, cancelling any pending timer.
    ///
    /// Used when the owning component goes away for unrelated reasons.
    pub fn teardown(&mut self, now: Duration) -> Option<LifecycleChange> {
        if self.state == OverlayState::Unmounted {
            self.timer.cancel();
            return None;
        }
        Some(self.transition(OverlayState::Unmounted, now))
    }

    fn complete(&mut self, step: Step, now: Duration) -> Option<LifecycleChange> {
        match (step, self.state) {
            (Step::Reveal, OverlayState::Mounting) => {
                Some(self.transition(OverlayState::Visible, now))
            }
            (Step::Unmount, OverlayState::Dismissing) => {
                Some(self.transition(OverlayState::Unmounted, now))
            }
            _ => None,
        }
    }

    fn transition(&mut self, to: OverlayState, now: Duration) -> LifecycleChange {
        self.timer.cancel();
        let change = LifecycleChange {
            from: self.state,
            to,
            at: now,
        };
        self.state = to;
        self.since = now;
        self.transitions += 1;
        berth_core::debug!(from = %change.from, to = %change.to, at_ms = now.as_millis() as u64, "overlay transition");
        change
    }
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::new(LifecycleTimings::default())
    }
}
