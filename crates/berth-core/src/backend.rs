#![forbid(unsafe_code)]

//! Host boundary traits.
//!
//! The engine never touches a real document. Everything it does to the page
//! goes through these traits:
//!
//! - [`HostClock`]: monotonic time, owned by the host.
//! - [`StyleSink`]: inline style mutation on the document root and body.
//! - [`PortalHost`]: attach/detach overlay nodes directly under the body.
//!
//! A browser shim implements them against `document.documentElement` and
//! `document.body`; tests use the in-memory document from `berth-web`.

use core::time::Duration;

use bitflags::bitflags;
use web_time::Instant;

use crate::event::OverlayId;

/// Monotonic clock supplied by the host.
pub trait HostClock {
    /// Time since an arbitrary, fixed origin.
    fn now_mono(&self) -> Duration;
}

/// Wall-backed monotonic clock.
///
/// Uses `web_time::Instant`, which maps to `performance.now()` on wasm and to
/// `std::time::Instant` elsewhere.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Start a clock whose origin is now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::start()
    }
}

impl HostClock for MonotonicClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Document element whose inline style can be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StyleTarget {
    /// `document.documentElement` (`<html>`).
    Root,
    /// `document.body`.
    Body,
}

impl StyleTarget {
    /// Element name, for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "html",
            Self::Body => "body",
        }
    }
}

bitflags! {
    /// Set of [`StyleTarget`]s a style change applies to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StyleTargets: u8 {
        /// Document root element.
        const ROOT = 0b01;
        /// Document body element.
        const BODY = 0b10;
    }
}

impl StyleTargets {
    /// Expand the flag set into concrete targets, root first.
    pub fn targets(self) -> impl Iterator<Item = StyleTarget> {
        [
            (Self::ROOT, StyleTarget::Root),
            (Self::BODY, StyleTarget::Body),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.contains(*flag))
        .map(|(_, target)| target)
    }
}

impl Default for StyleTargets {
    fn default() -> Self {
        Self::all()
    }
}

/// Priority of an inline style declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StylePriority {
    /// Plain declaration; page stylesheets with higher specificity win.
    #[default]
    Normal,
    /// `!important`; ordinary page styling cannot override it.
    Important,
}

/// Inline style mutation on document-level elements.
pub trait StyleSink {
    /// Set `name: value` on `target`.
    fn set_property(
        &mut self,
        target: StyleTarget,
        name: &str,
        value: &str,
        priority: StylePriority,
    );

    /// Remove `name` from `target`. Removing an absent property is a no-op.
    fn remove_property(&mut self, target: StyleTarget, name: &str);
}

/// Body-level mount point for overlay nodes.
///
/// Overlays render into a node appended directly under the body so that fixed
/// positioning and stacking are not affected by ancestor styles.
pub trait PortalHost {
    /// Append the node for `id` under the body.
    fn attach(&mut self, id: OverlayId);

    /// Remove the node for `id`. Detaching an absent node is a no-op.
    fn detach(&mut self, id: OverlayId);
}
