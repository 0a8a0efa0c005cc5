#![forbid(unsafe_code)]

//! One overlay instance.
//!
//! [`Overlay`] owns a [`LifecycleController`] and applies the side effects of
//! each state change against the shared services:
//!
//! | change                 | effect                                              |
//! |------------------------|-----------------------------------------------------|
//! | `Unmounted → Mounting` | attach portal node, acquire scroll lock, arm settle |
//! | `Dismissing → Mounting`| nothing (node and lock are still held)              |
//! | `→ Visible`            | tween toward shown                                  |
//! | `→ Dismissing`         | tween toward hidden                                 |
//! | `→ Unmounted`          | detach node, release lock, reset indicator          |
//!
//! Dropping an `Overlay` that is still mounted detaches its node and releases
//! its lock, so an owner that disappears mid-animation leaves nothing behind.

use core::time::Duration;

use berth_core::animation::{AnimatedProperty, TransitionSpec, Tween};
use berth_core::backend::PortalHost;
use berth_core::config::OverlayConfig;
use berth_core::event::OverlayId;
use berth_core::geometry::ScrollMetrics;
use berth_layout::ContentBounds;
use berth_runtime::timer::TimerToken;
use berth_runtime::{ScrollLock, ScrollLockGuard, Viewport};

use crate::dismiss::{DismissReason, OverlayOptions};
use crate::lifecycle::{LifecycleChange, LifecycleController, LifecycleTimings, OverlayState};
use crate::scroll_indicator::ScrollIndicator;
use crate::surface::{Surface, SurfaceSelector, Variant};

/// Services shared by every overlay on a page.
#[derive(Debug, Clone)]
pub struct OverlayServices {
    /// Document scroll lock.
    pub scroll_lock: ScrollLock,
    /// Live viewport size and classification.
    pub viewport: Viewport,
}

impl OverlayServices {
    /// Bundle the shared services.
    #[must_use]
    pub fn new(scroll_lock: ScrollLock, viewport: Viewport) -> Self {
        Self {
            scroll_lock,
            viewport,
        }
    }
}

/// Render-ready snapshot of one overlay.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayFrame {
    /// Overlay identity.
    pub id: OverlayId,
    /// Lifecycle state.
    pub state: OverlayState,
    /// Surface currently presented.
    pub surface: Surface,
    /// Whether the node is in the document.
    pub mounted: bool,
    /// Whether the animated property is at its shown value.
    pub shown: bool,
    /// Whether a dimmed backdrop is rendered behind the surface.
    pub backdrop: bool,
    /// Property being animated.
    pub property: AnimatedProperty,
    /// Current CSS value of [`Self::property`].
    pub style_value: String,
    /// `transition` shorthand.
    pub transition: String,
    /// Sampled shown fraction, for hosts without a CSS transition engine.
    pub progress: f32,
    /// Upper bound on the content region height, in CSS pixels.
    pub max_content_height: u32,
    /// Whether the "more content below" affordance is visible.
    pub show_more: bool,
}

impl OverlayFrame {
    /// Inline style declarations for the overlay node.
    #[must_use]
    pub fn css(&self) -> String {
        format!(
            "{}: {}; transition: {}",
            self.property.css_property(),
            self.style_value,
            self.transition
        )
    }
}

/// One overlay instance bound to the shared page services.
pub struct Overlay {
    id: OverlayId,
    options: OverlayOptions,
    controller: LifecycleController,
    selector: SurfaceSelector,
    indicator: ScrollIndicator,
    bounds: ContentBounds,
    transition: Duration,
    tween: Tween,
    scroll_lock: ScrollLock,
    viewport: Viewport,
    portal: Box<dyn PortalHost>,
    lock_guard: Option<ScrollLockGuard>,
    attached: bool,
    last_dismiss: Option<DismissReason>,
}

impl Overlay {
    /// Create an unmounted overlay.
    #[must_use]
    pub fn new(
        id: OverlayId,
        variant: Variant,
        config: &OverlayConfig,
        services: &OverlayServices,
        portal: Box<dyn PortalHost>,
        options: OverlayOptions,
    ) -> Self {
        Self {
            id,
            options,
            controller: LifecycleController::new(LifecycleTimings::from_config(config)),
            selector: SurfaceSelector::new(variant, &services.viewport),
            indicator: ScrollIndicator::new(config.near_bottom_threshold, config.settle_delay),
            bounds: ContentBounds::new(config.max_content_height),
            transition: config.effective_transition(),
            tween: Tween::at_rest(0.0),
            scroll_lock: services.scroll_lock.clone(),
            viewport: services.viewport.clone(),
            portal,
            lock_guard: None,
            attached: false,
            last_dismiss: None,
        }
    }

    /// Overlay identity.
    #[must_use]
    pub fn id(&self) -> OverlayId {
        self.id
    }

    /// Behavior switches.
    #[must_use]
    pub fn options(&self) -> OverlayOptions {
        self.options
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.controller.state()
    }

    /// Surface currently presented.
    #[must_use]
    pub fn surface(&self) -> Surface {
        self.selector.current()
    }

    /// Whether the node is in the document.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Whether this overlay currently holds the scroll lock.
    #[must_use]
    pub fn holds_scroll_lock(&self) -> bool {
        self.lock_guard.is_some()
    }

    /// Whether the "more content below" affordance is visible.
    #[must_use]
    pub fn show_more(&self) -> bool {
        self.indicator.show_affordance()
    }

    /// Reason for the most recent honored close request since the last open.
    #[must_use]
    pub fn last_dismiss(&self) -> Option<DismissReason> {
        self.last_dismiss
    }

    /// Underlying state machine.
    #[must_use]
    pub fn controller(&self) -> &LifecycleController {
        &self.controller
    }

    /// Earliest pending deadline (lifecycle or settle timer).
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.controller.next_deadline(), self.indicator.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Token for the pending lifecycle timer.
    #[must_use]
    pub fn pending_token(&self) -> Option<TimerToken> {
        self.controller.pending_token()
    }

    /// Ask the overlay to open.
    pub fn open(&mut self, now: Duration) -> Option<LifecycleChange> {
        let change = self.controller.request_open(now)?;
        self.last_dismiss = None;
        Some(self.apply(change))
    }

    /// Ask the overlay to close programmatically.
    pub fn close(&mut self, now: Duration) -> Option<LifecycleChange> {
        self.dismiss(DismissReason::Programmatic, now)
    }

    /// Ask the overlay to close for `reason`, subject to its options.
    pub fn dismiss(&mut self, reason: DismissReason, now: Duration) -> Option<LifecycleChange> {
        if !self.options.allows(reason) {
            berth_core::trace!(overlay = %self.id, reason = reason.as_str(), "dismiss suppressed by options");
            return None;
        }
        let change = self.controller.request_close(now)?;
        self.last_dismiss = Some(reason);
        Some(self.apply(change))
    }

    /// Drive from an external "is open" boolean.
    pub fn set_open(&mut self, open: bool, now: Duration) -> Option<LifecycleChange> {
        if open {
            self.open(now)
        } else {
            self.close(now)
        }
    }

    /// Trigger clicked: open unless the latest intent was already "open".
    pub fn toggle(&mut self, now: Duration) -> Option<LifecycleChange> {
        if self.state().is_open_intent() {
            self.dismiss(DismissReason::Toggle, now)
        } else {
            self.open(now)
        }
    }

    /// Fire every timer due at `now`.
    pub fn poll(&mut self, now: Duration) -> Option<LifecycleChange> {
        if self.indicator.poll(now) {
            berth_core::trace!(overlay = %self.id, show = self.indicator.show_affordance(), "scroll affordance settled");
        }
        let change = self.controller.poll(now)?;
        Some(self.apply(change))
    }

    /// Fire the lifecycle timer from a host callback.
    pub fn on_timer(&mut self, token: TimerToken, now: Duration) -> Option<LifecycleChange> {
        let change = self.controller.on_timer(token, now)?;
        Some(self.apply(change))
    }

    /// Content scrolled. Returns `true` if the affordance flipped.
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) -> bool {
        self.tracks_content() && self.indicator.on_scroll(metrics)
    }

    /// Content measured. Returns `true` if the affordance flipped.
    pub fn on_measure(&mut self, metrics: ScrollMetrics) -> bool {
        self.tracks_content() && self.indicator.on_measure(metrics)
    }

    /// The shared viewport was resized. Returns `true` if the affordance flipped.
    ///
    /// Surface selection already followed the viewport through its subscription.
    pub fn on_viewport_resize(&mut self) -> bool {
        self.tracks_content() && self.indicator.on_resize()
    }

    /// Force the overlay out of the document at once.
    pub fn teardown(&mut self, now: Duration) -> Option<LifecycleChange> {
        let change = self.controller.teardown(now)?;
        Some(self.apply(change))
    }

    /// Render-ready snapshot at `now`.
    #[must_use]
    pub fn frame(&self, now: Duration) -> OverlayFrame {
        let state = self.state();
        let surface = self.surface();
        let property = surface.animated_property();
        let shown = state.is_shown();
        let transition = TransitionSpec {
            property,
            duration: self.transition,
            easing: surface.easing(),
        };
        OverlayFrame {
            id: self.id,
            state,
            surface,
            mounted: state.is_mounted(),
            shown,
            backdrop: state.is_mounted() && surface.has_backdrop(),
            property,
            style_value: property.css_value(if shown { 1.0 } else { 0.0 }),
            transition: transition.css(),
            progress: self.tween.sample(now),
            max_content_height: self.bounds.max_height(self.viewport.size()),
            show_more: self.indicator.show_affordance(),
        }
    }

    fn tracks_content(&self) -> bool {
        self.options.scroll_indicator && self.state().is_mounted()
    }

    fn apply(&mut self, change: LifecycleChange) -> LifecycleChange {
        let now = change.at;
        match change.to {
            OverlayState::Mounting => {
                if change.from == OverlayState::Unmounted {
                    self.mount(now);
                }
            }
            OverlayState::Visible => self.retarget(1.0, now),
            OverlayState::Dismissing => self.retarget(0.0, now),
            OverlayState::Unmounted => self.unmount(),
        }
        change
    }

    fn mount(&mut self, now: Duration) {
        if !self.attached {
            self.portal.attach(self.id);
            self.attached = true;
        }
        if self.options.lock_scroll && self.lock_guard.is_none() {
            self.lock_guard = Some(self.scroll_lock.acquire());
        }
        if self.options.scroll_indicator {
            self.indicator.on_mount(now);
        }
        self.tween = Tween::at_rest(0.0);
    }

    fn unmount(&mut self) {
        if self.attached {
            self.portal.detach(self.id);
            self.attached = false;
        }
        if let Some(guard) = self.lock_guard.take() {
            self.scroll_lock.release(guard);
        }
        self.indicator.reset();
        self.tween = Tween::at_rest(0.0);
    }

    fn retarget(&mut self, target: f32, now: Duration) {
        self.tween = Tween::new(self.tween.sample(now), target, now, self.transition)
            .easing(self.surface().easing());
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        if self.attached {
            berth_core::debug!(overlay = %self.id, state = %self.state(), "overlay dropped while mounted");
            self.unmount();
        }
    }
}

impl std::fmt::Debug for Overlay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Overlay")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("surface", &self.surface())
            .field("attached", &self.attached)
            .field("locked", &self.lock_guard.is_some())
            .finish()
    }
}
