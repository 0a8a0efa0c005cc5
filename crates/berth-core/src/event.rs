#![forbid(unsafe_code)]

//! Canonical host events.
//!
//! The host translates browser callbacks (resize, scroll, keydown, clicks,
//! and the app's own open/close intents) into [`Event`] values and pushes them
//! in arrival order. The engine never reorders them.

use core::fmt;

use crate::geometry::ScrollMetrics;

/// Identifier of one overlay instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayId(pub u64);

impl OverlayId {
    /// Create a new overlay ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "overlay#{}", self.0)
    }
}

/// Keys the overlay engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KeyCode {
    /// Escape key.
    Escape,
    /// Enter key.
    Enter,
    /// Tab key.
    Tab,
    /// Any other printable key.
    Char(char),
}

/// An event pushed by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    /// The app asked for an overlay to open (trigger clicked, prop became true).
    Open(OverlayId),
    /// The app asked for an overlay to close (close button, prop became false).
    Close(OverlayId),
    /// The overlay's trigger was clicked: open if closed or closing, else close.
    Toggle(OverlayId),
    /// Click on the dimmed backdrop behind an overlay.
    BackdropClick(OverlayId),
    /// Key press at document level.
    Key(KeyCode),
    /// Viewport resized.
    Resize {
        /// New width in CSS pixels.
        width: u32,
        /// New height in CSS pixels.
        height: u32,
    },
    /// Overlay content region scrolled.
    Scroll {
        /// Overlay whose content scrolled.
        overlay: OverlayId,
        /// Geometry after the scroll.
        metrics: ScrollMetrics,
    },
    /// Layout measured overlay content without a scroll (content changed).
    Measure {
        /// Overlay whose content was measured.
        overlay: OverlayId,
        /// Measured geometry.
        metrics: ScrollMetrics,
    },
    /// Animation frame with no other input.
    Tick,
}

impl Event {
    /// Overlay targeted by this event, if it targets exactly one.
    #[must_use]
    pub const fn overlay(&self) -> Option<OverlayId> {
        match self {
            Self::Open(id) | Self::Close(id) | Self::Toggle(id) | Self::BackdropClick(id) => {
                Some(*id)
            }
            Self::Scroll { overlay, .. } | Self::Measure { overlay, .. } => Some(*overlay),
            Self::Key(_) | Self::Resize { .. } | Self::Tick => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_target_extraction() {
        let id = OverlayId::new(7);
        assert_eq!(Event::Open(id).overlay(), Some(id));
        assert_eq!(
            Event::Scroll {
                overlay: id,
                metrics: ScrollMetrics::default()
            }
            .overlay(),
            Some(id)
        );
        assert_eq!(Event::Key(KeyCode::Escape).overlay(), None);
        assert_eq!(
            Event::Resize {
                width: 800,
                height: 600
            }
            .overlay(),
            None
        );
    }

    #[test]
    fn overlay_id_display() {
        assert_eq!(OverlayId::new(3).to_string(), "overlay#3");
    }
}
