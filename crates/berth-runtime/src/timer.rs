#![forbid(unsafe_code)]

//! Single-shot cancellable timers with generation tokens.
//!
//! A [`Timer`] holds at most one pending deadline and its payload. Every
//! [`arm`](Timer::arm) and [`cancel`](Timer::cancel) bumps the generation, so
//! a [`TimerToken`] handed out earlier becomes stale the moment the timer is
//! re-armed or cancelled. This is what keeps a late callback from an old
//! `setTimeout` from corrupting state after a rapid open → close → open.
//!
//! Two ways to drive a timer:
//!
//! - **Polling**: call [`fire_due`](Timer::fire_due) with the current host
//!   time each frame.
//! - **Callbacks**: schedule a real host timer for
//!   [`deadline`](Timer::deadline) and, when it fires, hand the token back to
//!   [`take_if_current`](Timer::take_if_current). Stale tokens yield `None`.

use core::time::Duration;

/// Proof of one particular arming of a [`Timer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimerToken {
    generation: u64,
}

impl TimerToken {
    /// Generation this token was issued for.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone)]
struct Pending<T> {
    deadline: Duration,
    payload: T,
}

/// One cancellable deadline carrying a payload.
#[derive(Debug, Clone)]
pub struct Timer<T> {
    generation: u64,
    pending: Option<Pending<T>>,
}

impl<T> Default for Timer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Timer<T> {
    /// Create an idle timer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generation: 0,
            pending: None,
        }
    }

    /// Arm the timer to fire `delay` after `now`, replacing anything pending.
    pub fn arm(&mut self, now: Duration, delay: Duration, payload: T) -> TimerToken {
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(Pending {
            deadline: now.saturating_add(delay),
            payload,
        });
        TimerToken {
            generation: self.generation,
        }
    }

    /// Cancel the pending deadline. Returns the payload if one was pending.
    pub fn cancel(&mut self) -> Option<T> {
        self.generation = self.generation.wrapping_add(1);
        self.pending.take().map(|p| p.payload)
    }

    /// Whether a deadline is pending.
    #[inline]
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Pending deadline, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Pending payload, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.payload)
    }

    /// Token for the current arming, if armed.
    #[must_use]
    pub fn token(&self) -> Option<TimerToken> {
        self.pending.as_ref().map(|_| TimerToken {
            generation: self.generation,
        })
    }

    /// Time left until the deadline, saturating at zero.
    #[must_use]
    pub fn remaining(&self, now: Duration) -> Option<Duration> {
        self.deadline().map(|d| d.saturating_sub(now))
    }

    /// Whether `token` belongs to the current arming.
    #[must_use]
    pub fn is_current(&self, token: TimerToken) -> bool {
        self.pending.is_some() && token.generation == self.generation
    }

    /// Fire the timer if its deadline has passed at `now`.
    pub fn fire_due(&mut self, now: Duration) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| p.deadline <= now) {
            self.pending.take().map(|p| p.payload)
        } else {
            None
        }
    }

    /// Fire the timer on behalf of a host callback.
    ///
    /// Returns the payload only if `token` is current. The deadline is not
    /// consulted: host timers may fire slightly early or late.
    pub fn take_if_current(&mut self, token: TimerToken) -> Option<T> {
        if self.is_current(token) {
            self.pending.take().map(|p| p.payload)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(non_snake_case)]
    fn MS(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn idle_timer_never_fires() {
        let mut timer: Timer<u8> = Timer::new();
        assert!(!timer.is_armed());
        assert_eq!(timer.fire_due(MS(10_000)), None);
        assert_eq!(timer.deadline(), None);
    }

    #[test]
    fn fires_at_deadline_once() {
        let mut timer = Timer::new();
        timer.arm(MS(100), MS(50), "reveal");
        assert_eq!(timer.fire_due(MS(149)), None);
        assert_eq!(timer.fire_due(MS(150)), Some("reveal"));
        assert_eq!(timer.fire_due(MS(500)), None);
    }

    #[test]
    fn rearm_replaces_pending() {
        let mut timer = Timer::new();
        timer.arm(MS(0), MS(300), 1);
        timer.arm(MS(10), MS(50), 2);
        assert_eq!(timer.deadline(), Some(MS(60)));
        assert_eq!(timer.fire_due(MS(400)), Some(2));
    }

    #[test]
    fn cancel_returns_payload() {
        let mut timer = Timer::new();
        timer.arm(MS(0), MS(50), 'x');
        assert_eq!(timer.cancel(), Some('x'));
        assert_eq!(timer.cancel(), None);
        assert_eq!(timer.fire_due(MS(1_000)), None);
    }

    #[test]
    fn stale_token_is_rejected_after_rearm() {
        let mut timer = Timer::new();
        let old = timer.arm(MS(0), MS(300), "unmount");
        let new = timer.arm(MS(5), MS(50), "reveal");
        assert!(!timer.is_current(old));
        assert_eq!(timer.take_if_current(old), None);
        assert_eq!(timer.take_if_current(new), Some("reveal"));
    }

    #[test]
    fn stale_token_is_rejected_after_cancel_and_rearm_with_same_payload() {
        let mut timer = Timer::new();
        let first = timer.arm(MS(0), MS(50), ());
        timer.cancel();
        let second = timer.arm(MS(1), MS(50), ());
        assert_ne!(first, second);
        assert_eq!(timer.take_if_current(first), None);
        assert!(timer.is_armed());
    }

    #[test]
    fn token_after_fire_is_not_current() {
        let mut timer = Timer::new();
        let token = timer.arm(MS(0), MS(10), ());
        assert_eq!(timer.fire_due(MS(10)), Some(()));
        assert!(!timer.is_current(token));
        assert_eq!(timer.token(), None);
    }

    #[test]
    fn remaining_saturates() {
        let mut timer = Timer::new();
        timer.arm(MS(0), MS(100), ());
        assert_eq!(timer.remaining(MS(40)), Some(MS(60)));
        assert_eq!(timer.remaining(MS(400)), Some(Duration::ZERO));
    }
}
