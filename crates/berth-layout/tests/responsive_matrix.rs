//! Classification matrix across common device widths and arbitrary breakpoints.

use berth_core::geometry::Size;
use berth_layout::{Breakpoint, ViewportClass};
use proptest::prelude::*;

#[test]
fn common_device_widths() {
    let bp = Breakpoint::default();
    let cases = [
        (320, ViewportClass::Narrow),
        (375, ViewportClass::Narrow),
        (414, ViewportClass::Narrow),
        (767, ViewportClass::Narrow),
        (768, ViewportClass::Wide),
        (1024, ViewportClass::Wide),
        (1440, ViewportClass::Wide),
    ];
    for (width, expected) in cases {
        assert_eq!(
            bp.classify_size(Size::new(width, 800)),
            expected,
            "width {width}"
        );
    }
}

proptest! {
    #[test]
    fn classification_is_a_single_cut(threshold in 1u32..4000, width in 0u32..8000) {
        let bp = Breakpoint::new(threshold);
        let class = bp.classify_width(width);
        prop_assert_eq!(class.is_narrow(), width < threshold);
    }

    #[test]
    fn wider_never_becomes_narrower(threshold in 1u32..4000, a in 0u32..8000, b in 0u32..8000) {
        let bp = Breakpoint::new(threshold);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(bp.classify_width(lo) <= bp.classify_width(hi));
    }
}
