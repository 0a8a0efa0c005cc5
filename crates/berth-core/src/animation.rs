#![forbid(unsafe_code)]

//! Animation curves and animated style properties.
//!
//! Overlays animate exactly one property between a *hidden* and a *shown*
//! value. In a browser the CSS transition engine does the interpolation; the
//! engine only flips the value and emits the `transition` declaration. Hosts
//! without a transition engine sample a [`Tween`] each frame instead.

use core::time::Duration;

// ---------------------------------------------------------------------------
// Easing
// ---------------------------------------------------------------------------

/// Easing curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Easing {
    /// Constant velocity.
    Linear,
    /// Quadratic slow start.
    EaseIn,
    /// Quadratic slow end.
    #[default]
    EaseOut,
    /// Quadratic slow start and end.
    EaseInOut,
    /// Cubic slow end; snappier than [`Easing::EaseOut`].
    EaseOutCubic,
}

impl Easing {
    /// Map `t` in [0, 1] to eased output in [0, 1].
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }

    /// CSS `transition-timing-function` equivalent.
    #[must_use]
    pub const fn css_name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
            Self::EaseOutCubic => "cubic-bezier(0.33, 1, 0.68, 1)",
        }
    }
}

// ---------------------------------------------------------------------------
// Animated property
// ---------------------------------------------------------------------------

/// The single style property an overlay animates.
///
/// Translations are percentages of the overlay's own size, so `100.0` on
/// [`AnimatedProperty::TranslateY`] parks a bottom sheet just below the fold.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimatedProperty {
    /// Horizontal slide (`transform: translateX(..%)`).
    TranslateX {
        /// Offset while hidden.
        hidden: f32,
        /// Offset while shown.
        shown: f32,
    },
    /// Vertical slide (`transform: translateY(..%)`).
    TranslateY {
        /// Offset while hidden.
        hidden: f32,
        /// Offset while shown.
        shown: f32,
    },
    /// Fade (`opacity`).
    Opacity {
        /// Opacity while hidden.
        hidden: f32,
        /// Opacity while shown.
        shown: f32,
    },
}

impl AnimatedProperty {
    /// Slide up from below the viewport edge.
    pub const SLIDE_UP: Self = Self::TranslateY {
        hidden: 100.0,
        shown: 0.0,
    };
    /// Slide in from the right edge.
    pub const SLIDE_FROM_RIGHT: Self = Self::TranslateX {
        hidden: 100.0,
        shown: 0.0,
    };
    /// Slide in from the left edge.
    pub const SLIDE_FROM_LEFT: Self = Self::TranslateX {
        hidden: -100.0,
        shown: 0.0,
    };
    /// Plain fade in.
    pub const FADE: Self = Self::Opacity {
        hidden: 0.0,
        shown: 1.0,
    };

    /// CSS property name.
    #[must_use]
    pub const fn css_property(&self) -> &'static str {
        match self {
            Self::TranslateX { .. } | Self::TranslateY { .. } => "transform",
            Self::Opacity { .. } => "opacity",
        }
    }

    const fn endpoints(&self) -> (f32, f32) {
        match *self {
            Self::TranslateX { hidden, shown }
            | Self::TranslateY { hidden, shown }
            | Self::Opacity { hidden, shown } => (hidden, shown),
        }
    }

    /// Interpolated value: `0.0` is fully hidden, `1.0` fully shown.
    #[must_use]
    pub fn value_at(&self, shown_fraction: f32) -> f32 {
        let (hidden, shown) = self.endpoints();
        let t = shown_fraction.clamp(0.0, 1.0);
        hidden + (shown - hidden) * t
    }

    /// CSS value at the given shown fraction.
    #[must_use]
    pub fn css_value(&self, shown_fraction: f32) -> String {
        let v = self.value_at(shown_fraction);
        match self {
            Self::TranslateX { .. } => format!("translateX({v}%)"),
            Self::TranslateY { .. } => format!("translateY({v}%)"),
            Self::Opacity { .. } => format!("{v}"),
        }
    }
}

/// CSS transition declaration for an animated property.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSpec {
    /// Animated property.
    pub property: AnimatedProperty,
    /// Transition duration.
    pub duration: Duration,
    /// Timing function.
    pub easing: Easing,
}

impl TransitionSpec {
    /// `transition` shorthand value, e.g. `transform 300ms ease-out`.
    #[must_use]
    pub fn css(&self) -> String {
        format!(
            "{} {}ms {}",
            self.property.css_property(),
            self.duration.as_millis(),
            self.easing.css_name()
        )
    }
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// Time-based interpolation of the shown fraction between two values.
///
/// Starting a new tween from the current sampled value reverses an animation
/// smoothly, which is what CSS does when a transition is interrupted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    start: Duration,
    duration: Duration,
    easing: Easing,
}

impl Tween {
    /// Tween from `from` to `to` starting at host time `start`.
    ///
    /// A zero duration is treated as 1ns so the tween completes on the next
    /// sample rather than dividing by zero.
    #[must_use]
    pub fn new(from: f32, to: f32, start: Duration, duration: Duration) -> Self {
        Self {
            from: from.clamp(0.0, 1.0),
            to: to.clamp(0.0, 1.0),
            start,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: Easing::default(),
        }
    }

    /// A tween already resting at `value`.
    #[must_use]
    pub fn at_rest(value: f32) -> Self {
        Self::new(value, value, Duration::ZERO, Duration::ZERO)
    }

    /// Set the easing curve.
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Target value.
    #[must_use]
    pub const fn target(&self) -> f32 {
        self.to
    }

    /// Linear progress at `now`, before easing.
    #[must_use]
    pub fn raw_progress(&self, now: Duration) -> f32 {
        let elapsed = now.saturating_sub(self.start);
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    /// Sampled value at `now`.
    #[must_use]
    pub fn sample(&self, now: Duration) -> f32 {
        let eased = self.easing.apply(self.raw_progress(now));
        self.from + (self.to - self.from) * eased
    }

    /// Whether the tween has reached its target at `now`.
    #[must_use]
    pub fn is_complete(&self, now: Duration) -> bool {
        now.saturating_sub(self.start) >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_300: Duration = Duration::from_millis(300);

    #[test]
    fn easing_endpoints_are_fixed() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
            Easing::EaseOutCubic,
        ] {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?} at 1");
        }
    }

    #[test]
    fn easing_clamps_input() {
        assert_eq!(Easing::Linear.apply(-3.0), 0.0);
        assert_eq!(Easing::Linear.apply(7.0), 1.0);
    }

    #[test]
    fn ease_out_is_ahead_of_linear() {
        assert!(Easing::EaseOut.apply(0.3) > 0.3);
        assert!(Easing::EaseIn.apply(0.3) < 0.3);
    }

    #[test]
    fn slide_up_css_values() {
        let p = AnimatedProperty::SLIDE_UP;
        assert_eq!(p.css_property(), "transform");
        assert_eq!(p.css_value(0.0), "translateY(100%)");
        assert_eq!(p.css_value(1.0), "translateY(0%)");
        assert_eq!(p.css_value(0.5), "translateY(50%)");
    }

    #[test]
    fn left_menu_starts_off_screen_left() {
        assert_eq!(
            AnimatedProperty::SLIDE_FROM_LEFT.css_value(0.0),
            "translateX(-100%)"
        );
    }

    #[test]
    fn fade_css_values() {
        let p = AnimatedProperty::FADE;
        assert_eq!(p.css_property(), "opacity");
        assert_eq!(p.css_value(0.0), "0");
        assert_eq!(p.css_value(1.0), "1");
    }

    #[test]
    fn transition_shorthand() {
        let spec = TransitionSpec {
            property: AnimatedProperty::SLIDE_UP,
            duration: MS_300,
            easing: Easing::EaseOut,
        };
        assert_eq!(spec.css(), "transform 300ms ease-out");
    }

    #[test]
    fn tween_reaches_target() {
        let start = Duration::from_millis(1000);
        let tween = Tween::new(0.0, 1.0, start, MS_300).easing(Easing::Linear);
        assert_eq!(tween.sample(start), 0.0);
        assert!((tween.sample(start + Duration::from_millis(150)) - 0.5).abs() < 1e-4);
        assert_eq!(tween.sample(start + MS_300), 1.0);
        assert!(tween.is_complete(start + MS_300));
        assert!(!tween.is_complete(start + Duration::from_millis(299)));
    }

    #[test]
    fn tween_before_start_holds_origin() {
        let tween = Tween::new(1.0, 0.0, Duration::from_secs(5), MS_300);
        assert_eq!(tween.sample(Duration::from_secs(1)), 1.0);
    }

    #[test]
    fn zero_duration_tween_completes_immediately() {
        let tween = Tween::new(0.0, 1.0, Duration::from_millis(10), Duration::ZERO);
        assert!(tween.is_complete(Duration::from_millis(11)));
        assert_eq!(tween.sample(Duration::from_millis(11)), 1.0);
    }

    #[test]
    fn at_rest_never_moves() {
        let tween = Tween::at_rest(1.0);
        assert_eq!(tween.sample(Duration::ZERO), 1.0);
        assert_eq!(tween.sample(Duration::from_secs(60)), 1.0);
    }
}
