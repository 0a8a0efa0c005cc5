//! Integration tests for the animation module.

use berth_core::animation::*;
use proptest::prelude::*;
use std::time::Duration;

const EASINGS: [Easing; 5] = [
    Easing::Linear,
    Easing::EaseIn,
    Easing::EaseOut,
    Easing::EaseInOut,
    Easing::EaseOutCubic,
];

#[test]
fn interrupted_tween_reverses_from_current_value() {
    let transition = Duration::from_millis(300);
    let enter = Tween::new(0.0, 1.0, Duration::ZERO, transition).easing(Easing::Linear);

    // Close requested halfway through the entrance.
    let halfway = Duration::from_millis(150);
    let current = enter.sample(halfway);
    let exit = Tween::new(current, 0.0, halfway, transition).easing(Easing::Linear);

    assert!((exit.sample(halfway) - current).abs() < 1e-6, "no jump at reversal");
    assert_eq!(exit.sample(halfway + transition), 0.0);
}

proptest! {
    #[test]
    fn easing_output_stays_in_unit_range(t in -2.0f32..3.0, idx in 0usize..5) {
        let v = EASINGS[idx].apply(t);
        prop_assert!((0.0..=1.0).contains(&v), "{:?}({}) = {}", EASINGS[idx], t, v);
    }

    #[test]
    fn easing_is_monotonic(a in 0.0f32..1.0, b in 0.0f32..1.0, idx in 0usize..5) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let easing = EASINGS[idx];
        prop_assert!(easing.apply(lo) <= easing.apply(hi) + 1e-6);
    }

    #[test]
    fn tween_samples_stay_between_endpoints(
        from in 0.0f32..=1.0,
        to in 0.0f32..=1.0,
        at_ms in 0u64..1000,
    ) {
        let tween = Tween::new(from, to, Duration::ZERO, Duration::from_millis(300));
        let v = tween.sample(Duration::from_millis(at_ms));
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        prop_assert!(v >= lo - 1e-6 && v <= hi + 1e-6);
    }

    #[test]
    fn property_values_stay_between_hidden_and_shown(fraction in -1.0f32..2.0) {
        let v = AnimatedProperty::SLIDE_UP.value_at(fraction);
        prop_assert!((0.0..=100.0).contains(&v));
    }
}
