#![forbid(unsafe_code)]

//! `berth-web` is a headless host for Berth overlays.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding environment pushes events and size changes.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! [`document::Document`] is an in-memory stand-in for the browser document
//! (root and body inline styles, body-level portal nodes).
//! [`step_host::StepHost`] routes queued events to registered overlays and
//! fires their timers. [`session_record`] records a session and replays it.

pub mod document;
pub mod session_record;
pub mod step_host;

use core::time::Duration;
use std::collections::VecDeque;

use berth_core::backend::HostClock;
use berth_core::event::{Event, OverlayId};
use berth_core::geometry::Size;

/// Web host error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebHostError {
    /// No overlay is registered under this id.
    UnknownOverlay(OverlayId),
    /// An overlay is already registered under this id.
    DuplicateOverlay(OverlayId),
    /// A trace line could not be parsed.
    TraceParse {
        /// 1-based line number.
        line: usize,
        /// Parser message.
        message: String,
    },
    /// A trace is structurally invalid.
    InvalidTrace(&'static str),
    /// Replay produced a different transition log than the recording.
    ReplayMismatch {
        /// Index of the first differing transition.
        index: usize,
        /// Transitions in the recording.
        expected: usize,
        /// Transitions produced by replay.
        actual: usize,
    },
}

impl core::fmt::Display for WebHostError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownOverlay(id) => write!(f, "unknown overlay: {id}"),
            Self::DuplicateOverlay(id) => write!(f, "overlay already registered: {id}"),
            Self::TraceParse { line, message } => {
                write!(f, "trace parse error at line {line}: {message}")
            }
            Self::InvalidTrace(msg) => write!(f, "invalid trace: {msg}"),
            Self::ReplayMismatch {
                index,
                expected,
                actual,
            } => write!(
                f,
                "replay diverged at transition {index} ({expected} recorded, {actual} replayed)"
            ),
        }
    }
}

impl std::error::Error for WebHostError {}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time. Earlier values are ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl HostClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Host-driven event queue.
///
/// The host pushes [`Event`] values in arrival order; they are read back in
/// the same order.
#[derive(Debug, Clone)]
pub struct WebEventSource {
    size: Size,
    queue: VecDeque<Event>,
}

impl WebEventSource {
    /// Create a new event source with an initial viewport size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: Size::new(width, height),
            queue: VecDeque::new(),
        }
    }

    /// Update the current size.
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.size = Size::new(width, height);
    }

    /// Last size pushed by the host.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Push a canonical event into the queue.
    pub fn push_event(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Pop the oldest pending event.
    pub fn read_event(&mut self) -> Option<Event> {
        self.queue.pop_front()
    }

    /// Number of pending events.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drain all pending events.
    pub fn drain_events(&mut self) -> impl Iterator<Item = Event> + '_ {
        self.queue.drain(..)
    }
}
