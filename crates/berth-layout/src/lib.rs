#![forbid(unsafe_code)]

//! Viewport classification and overlay content sizing.
//!
//! - [`ViewportClass`] / [`Breakpoint`]: narrow vs wide viewport tiers.
//! - [`ContentBounds`]: how tall overlay content may grow in a given viewport.

use berth_core::geometry::Size;

/// Responsive tier of the host viewport.
///
/// | Class    | Default width | Presentation        |
/// |----------|---------------|---------------------|
/// | `Narrow` | < 768 px      | Bottom drawer       |
/// | `Wide`   | ≥ 768 px      | Centered modal      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ViewportClass {
    /// Phone-sized viewport.
    Narrow,
    /// Tablet or desktop viewport.
    Wide,
}

impl ViewportClass {
    /// Short label for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Narrow => "narrow",
            Self::Wide => "wide",
        }
    }

    /// Whether this is the narrow tier.
    #[inline]
    #[must_use]
    pub const fn is_narrow(self) -> bool {
        matches!(self, Self::Narrow)
    }
}

impl std::fmt::Display for ViewportClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Width threshold separating narrow from wide viewports.
///
/// The boundary is exclusive on the narrow side: a viewport exactly
/// `narrow_below` pixels wide is wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Breakpoint {
    narrow_below: u32,
}

impl Breakpoint {
    /// Default breakpoint: 768 px.
    pub const DEFAULT: Self = Self { narrow_below: 768 };

    /// Create a breakpoint. A zero threshold is raised to 1 so that at least
    /// a zero-width viewport is narrow.
    #[must_use]
    pub const fn new(narrow_below: u32) -> Self {
        Self {
            narrow_below: if narrow_below == 0 { 1 } else { narrow_below },
        }
    }

    /// Threshold width in pixels.
    #[must_use]
    pub const fn threshold(self) -> u32 {
        self.narrow_below
    }

    /// Classify a width.
    #[inline]
    #[must_use]
    pub const fn classify_width(self, width: u32) -> ViewportClass {
        if width < self.narrow_below {
            ViewportClass::Narrow
        } else {
            ViewportClass::Wide
        }
    }

    /// Classify a size (uses width).
    #[inline]
    #[must_use]
    pub const fn classify_size(self, size: Size) -> ViewportClass {
        self.classify_width(size.width)
    }

    /// Equivalent CSS media query that matches narrow viewports.
    #[must_use]
    pub fn media_query(self) -> String {
        format!("(max-width: {}px)", self.narrow_below - 1)
    }
}

impl Default for Breakpoint {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Upper bound on overlay content height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentBounds {
    max_fraction: f64,
}

impl ContentBounds {
    /// Bound content to `max_fraction` of the viewport height.
    ///
    /// The fraction is clamped into [0, 1]; NaN is treated as 1.
    #[must_use]
    pub fn new(max_fraction: f64) -> Self {
        let max_fraction = if max_fraction.is_nan() {
            1.0
        } else {
            max_fraction.clamp(0.0, 1.0)
        };
        Self { max_fraction }
    }

    /// Configured fraction.
    #[must_use]
    pub const fn fraction(&self) -> f64 {
        self.max_fraction
    }

    /// Maximum content height in whole pixels for `viewport`.
    #[must_use]
    pub fn max_height(&self, viewport: Size) -> u32 {
        (f64::from(viewport.height) * self.max_fraction).floor() as u32
    }

    /// Whether content of `content_height` pixels must scroll inside `viewport`.
    #[must_use]
    pub fn must_scroll(&self, content_height: u32, viewport: Size) -> bool {
        content_height > self.max_height(viewport)
    }
}

impl Default for ContentBounds {
    fn default() -> Self {
        Self::new(0.9)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_is_exclusive_on_the_narrow_side() {
        let bp = Breakpoint::DEFAULT;
        assert_eq!(bp.classify_width(767), ViewportClass::Narrow);
        assert_eq!(bp.classify_width(768), ViewportClass::Wide);
        assert_eq!(bp.classify_width(1920), ViewportClass::Wide);
        assert_eq!(bp.classify_width(0), ViewportClass::Narrow);
    }

    #[test]
    fn classify_size_uses_width() {
        let bp = Breakpoint::DEFAULT;
        assert!(bp.classify_size(Size::new(375, 2000)).is_narrow());
        assert!(!bp.classify_size(Size::new(1024, 100)).is_narrow());
    }

    #[test]
    fn zero_threshold_is_raised() {
        assert_eq!(Breakpoint::new(0).threshold(), 1);
    }

    #[test]
    fn media_query_matches_classification() {
        assert_eq!(Breakpoint::DEFAULT.media_query(), "(max-width: 767px)");
    }

    #[test]
    fn class_labels() {
        assert_eq!(ViewportClass::Narrow.to_string(), "narrow");
        assert_eq!(ViewportClass::Wide.to_string(), "wide");
    }

    #[test]
    fn content_bounds_floor_to_whole_pixels() {
        let bounds = ContentBounds::default();
        assert_eq!(bounds.max_height(Size::new(375, 667)), 600);
        assert_eq!(bounds.max_height(Size::new(1280, 800)), 720);
    }

    #[test]
    fn content_bounds_clamp_fraction() {
        assert_eq!(ContentBounds::new(3.0).fraction(), 1.0);
        assert_eq!(ContentBounds::new(-1.0).fraction(), 0.0);
        assert_eq!(ContentBounds::new(f64::NAN).fraction(), 1.0);
    }

    #[test]
    fn must_scroll_above_bound() {
        let bounds = ContentBounds::new(0.5);
        let viewport = Size::new(400, 800);
        assert!(!bounds.must_scroll(400, viewport));
        assert!(bounds.must_scroll(401, viewport));
    }
}
