#![forbid(unsafe_code)]

//! Viewport sizes and scroll measurements, in CSS pixels.

/// Width and height of the host viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in CSS pixels.
    pub width: u32,
    /// Height in CSS pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Scroll geometry of a scrollable content region.
///
/// Mirrors the DOM triple `scrollTop` / `clientHeight` / `scrollHeight`.
/// Browsers report fractional offsets on zoomed pages, hence `f64`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScrollMetrics {
    /// Current scroll offset from the top of the content.
    pub scroll_top: f64,
    /// Visible height of the container.
    pub client_height: f64,
    /// Total height of the content.
    pub scroll_height: f64,
}

impl ScrollMetrics {
    /// Create metrics for content of `scroll_height` inside a container of
    /// `client_height`, scrolled to `scroll_top`.
    #[must_use]
    pub const fn new(scroll_top: f64, client_height: f64, scroll_height: f64) -> Self {
        Self {
            scroll_top,
            client_height,
            scroll_height,
        }
    }

    /// Same geometry scrolled to a different offset.
    #[must_use]
    pub const fn scrolled_to(self, scroll_top: f64) -> Self {
        Self { scroll_top, ..self }
    }

    /// Distance from the bottom of the visible region to the end of the content.
    ///
    /// Never negative; overscroll (rubber banding) reports zero.
    #[must_use]
    pub fn remaining(&self) -> f64 {
        (self.scroll_height - self.scroll_top - self.client_height).max(0.0)
    }

    /// Largest valid scroll offset.
    #[must_use]
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_counts_down_to_zero() {
        let m = ScrollMetrics::new(0.0, 400.0, 1000.0);
        assert_eq!(m.remaining(), 600.0);
        assert_eq!(m.scrolled_to(600.0).remaining(), 0.0);
    }

    #[test]
    fn overscroll_is_clamped() {
        let m = ScrollMetrics::new(700.0, 400.0, 1000.0);
        assert_eq!(m.remaining(), 0.0);
    }

    #[test]
    fn max_scroll_top_without_overflow_is_zero() {
        let m = ScrollMetrics::new(0.0, 400.0, 300.0);
        assert_eq!(m.max_scroll_top(), 0.0);
    }
}
