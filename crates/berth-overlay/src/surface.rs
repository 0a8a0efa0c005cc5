#![forbid(unsafe_code)]

//! Presentation surfaces and responsive selection.
//!
//! Every overlay variant is the same lifecycle with a different animated
//! property. [`Variant::Responsive`] picks a bottom sheet on narrow viewports
//! and a centered modal on wide ones, following the shared [`Viewport`]
//! classification live.

use std::cell::Cell;
use std::rc::Rc;

use berth_core::animation::{AnimatedProperty, Easing};
use berth_layout::ViewportClass;
use berth_runtime::{Subscription, Viewport};

/// Concrete visual form of an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Surface {
    /// Sheet sliding up from the bottom edge.
    BottomSheet,
    /// Dialog centered over a backdrop.
    CenteredModal,
    /// Panel sliding in from the right edge.
    RightDrawer,
    /// Navigation menu sliding in from the left edge.
    LeftMenu,
}

impl Surface {
    /// Property animated between hidden and shown.
    #[must_use]
    pub const fn animated_property(self) -> AnimatedProperty {
        match self {
            Self::BottomSheet => AnimatedProperty::SLIDE_UP,
            Self::CenteredModal => AnimatedProperty::FADE,
            Self::RightDrawer => AnimatedProperty::SLIDE_FROM_RIGHT,
            Self::LeftMenu => AnimatedProperty::SLIDE_FROM_LEFT,
        }
    }

    /// Timing function for the transition.
    #[must_use]
    pub const fn easing(self) -> Easing {
        match self {
            Self::CenteredModal => Easing::EaseInOut,
            Self::BottomSheet | Self::RightDrawer | Self::LeftMenu => Easing::EaseOut,
        }
    }

    /// Whether the surface dims the page behind it.
    #[must_use]
    pub const fn has_backdrop(self) -> bool {
        !matches!(self, Self::LeftMenu)
    }

    /// Short label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BottomSheet => "bottom-sheet",
            Self::CenteredModal => "modal",
            Self::RightDrawer => "drawer",
            Self::LeftMenu => "side-menu",
        }
    }

    /// Surface for a viewport classification in responsive mode.
    #[must_use]
    pub const fn for_class(class: ViewportClass) -> Self {
        match class {
            ViewportClass::Narrow => Self::BottomSheet,
            ViewportClass::Wide => Self::CenteredModal,
        }
    }
}

impl std::fmt::Display for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an overlay chooses its surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Variant {
    /// Bottom sheet on narrow viewports, centered modal on wide ones.
    #[default]
    Responsive,
    /// Always a right-hand drawer.
    Drawer,
    /// Always a left-hand side menu.
    SideMenu,
    /// Always a bottom sheet.
    BottomSheet,
    /// Always a centered modal.
    Modal,
}

impl Variant {
    /// Fixed surface, or `None` for [`Variant::Responsive`].
    #[must_use]
    pub const fn fixed_surface(self) -> Option<Surface> {
        match self {
            Self::Responsive => None,
            Self::Drawer => Some(Surface::RightDrawer),
            Self::SideMenu => Some(Surface::LeftMenu),
            Self::BottomSheet => Some(Surface::BottomSheet),
            Self::Modal => Some(Surface::CenteredModal),
        }
    }
}

/// Live surface choice for one overlay.
///
/// For responsive overlays this holds a viewport subscription; the current
/// surface is updated synchronously inside the viewport's resize call, before
/// the next frame is produced.
pub struct SurfaceSelector {
    current: Rc<Cell<Surface>>,
    subscription: Option<Subscription>,
}

impl SurfaceSelector {
    /// Selector for `variant`, following `viewport` if responsive.
    #[must_use]
    pub fn new(variant: Variant, viewport: &Viewport) -> Self {
        if let Some(surface) = variant.fixed_surface() {
            return Self {
                current: Rc::new(Cell::new(surface)),
                subscription: None,
            };
        }
        let current = Rc::new(Cell::new(Surface::for_class(viewport.class())));
        let sink = Rc::clone(&current);
        let subscription = viewport.subscribe(move |class| {
            let surface = Surface::for_class(class);
            sink.set(surface);
            berth_core::debug!(surface = %surface, "responsive surface switched");
        });
        Self {
            current,
            subscription: Some(subscription),
        }
    }

    /// Surface to render now.
    #[must_use]
    pub fn current(&self) -> Surface {
        self.current.get()
    }

    /// Whether this selector follows the viewport.
    #[must_use]
    pub fn is_responsive(&self) -> bool {
        self.subscription.is_some()
    }
}

impl std::fmt::Debug for SurfaceSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceSelector")
            .field("current", &self.current.get())
            .field("responsive", &self.is_responsive())
            .finish()
    }
}
