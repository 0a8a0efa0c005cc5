#![forbid(unsafe_code)]

//! Overlay presentation: lifecycle, scroll affordance, and surface selection.
//!
//! - [`lifecycle`]: the mount → reveal → dismiss → unmount state machine.
//! - [`scroll_indicator`]: "more content below" affordance.
//! - [`surface`]: drawer, side menu, bottom sheet, and modal presentations,
//!   plus the responsive selector between bottom sheet and modal.
//! - [`overlay`]: one overlay instance wiring the above to the scroll lock
//!   and the portal host.

pub mod dismiss;
pub mod lifecycle;
pub mod overlay;
pub mod scroll_indicator;
pub mod surface;

pub use dismiss::{DismissReason, OverlayOptions};
pub use lifecycle::{LifecycleChange, LifecycleController, LifecycleTimings, OverlayState};
pub use overlay::{Overlay, OverlayFrame, OverlayServices};
pub use scroll_indicator::ScrollIndicator;
pub use surface::{Surface, SurfaceSelector, Variant};
