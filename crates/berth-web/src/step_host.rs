#![forbid(unsafe_code)]

//! Step-based overlay host.
//!
//! [`StepHost`] owns the page-level services (document, scroll lock,
//! viewport) and every registered [`Overlay`]. The embedding environment
//! controls the loop:
//!
//! 1. Push events via [`StepHost::push_event`].
//! 2. Advance time via [`StepHost::advance_time`].
//! 3. Call [`StepHost::step`] to route the queued events and fire due timers.
//! 4. Read [`StepHost::frames`] and the document.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//!
//! use berth_core::config::OverlayConfig;
//! use berth_core::event::{Event, OverlayId};
//! use berth_overlay::{OverlayOptions, Variant};
//! use berth_web::step_host::StepHost;
//!
//! let mut host = StepHost::new(OverlayConfig::default(), 1280, 800);
//! host.register(OverlayId(1), Variant::Responsive, OverlayOptions::default())?;
//!
//! host.push_event(Event::Open(OverlayId(1)));
//! host.step()?;
//! host.advance_time(Duration::from_millis(50));
//! host.step()?;
//! assert!(host.document().is_scroll_suppressed());
//! # Ok::<(), berth_web::WebHostError>(())
//! ```

use core::time::Duration;

use berth_core::backend::HostClock;
use berth_core::config::OverlayConfig;
use berth_core::event::{Event, KeyCode, OverlayId};
use berth_core::geometry::Size;
use berth_layout::Breakpoint;
use berth_overlay::{
    DismissReason, LifecycleChange, Overlay, OverlayFrame, OverlayOptions, OverlayServices,
    OverlayState, Variant,
};
use berth_runtime::{ScrollLock, Viewport};
use tracing::{debug, warn};

use crate::document::Document;
use crate::{DeterministicClock, WebEventSource, WebHostError};

/// A lifecycle change attributed to one overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HostTransition {
    /// Overlay that changed.
    pub overlay: OverlayId,
    /// The change.
    pub change: LifecycleChange,
}

/// Result of a single [`StepHost::step`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    /// Number of events processed during this step.
    pub events_processed: u32,
    /// Events naming an overlay that is not registered.
    pub events_dropped: u32,
    /// Lifecycle transitions during this step.
    pub transitions: u32,
    /// Step index (monotonically increasing).
    pub step_idx: u64,
    /// Overlays currently in the document.
    pub mounted: usize,
    /// Earliest pending timer, for scheduling the next wakeup.
    pub next_deadline: Option<Duration>,
}

/// Host-driven, non-blocking overlay runner.
pub struct StepHost {
    config: OverlayConfig,
    clock: DeterministicClock,
    events: WebEventSource,
    document: Document,
    services: OverlayServices,
    overlays: Vec<Overlay>,
    transitions: Vec<HostTransition>,
    frames: Vec<OverlayFrame>,
    step_idx: u64,
}

impl StepHost {
    /// Create a host with an empty document and a `width`×`height` viewport.
    #[must_use]
    pub fn new(config: OverlayConfig, width: u32, height: u32) -> Self {
        let document = Document::new();
        let services = OverlayServices::new(
            ScrollLock::new(Box::new(document.clone())),
            Viewport::new(
                Size::new(width, height),
                Breakpoint::new(config.narrow_below),
            ),
        );
        Self {
            config,
            clock: DeterministicClock::new(),
            events: WebEventSource::new(width, height),
            document,
            services,
            overlays: Vec::new(),
            transitions: Vec::new(),
            frames: Vec::new(),
            step_idx: 0,
        }
    }

    /// Register an overlay. It starts unmounted.
    pub fn register(
        &mut self,
        id: OverlayId,
        variant: Variant,
        options: OverlayOptions,
    ) -> Result<(), WebHostError> {
        if self.index_of(id).is_some() {
            return Err(WebHostError::DuplicateOverlay(id));
        }
        let overlay = Overlay::new(
            id,
            variant,
            &self.config,
            &self.services,
            Box::new(self.document.clone()),
            options,
        );
        debug!(overlay = %id, ?variant, "overlay registered");
        self.overlays.push(overlay);
        Ok(())
    }

    /// Remove an overlay at once, as when its owning component goes away.
    ///
    /// A mounted overlay is torn down (node removed, lock released) without
    /// waiting for its exit transition.
    pub fn unregister(&mut self, id: OverlayId) -> Result<(), WebHostError> {
        let idx = self.index_of(id).ok_or(WebHostError::UnknownOverlay(id))?;
        let now = self.now();
        let mut overlay = self.overlays.remove(idx);
        if let Some(change) = overlay.teardown(now) {
            self.record(id, change);
        }
        debug!(overlay = %id, "overlay unregistered");
        Ok(())
    }

    /// Push an event. It is processed on the next [`step`](Self::step) call.
    pub fn push_event(&mut self, event: Event) {
        if let Event::Resize { width, height } = event {
            self.events.set_size(width, height);
        }
        self.events.push_event(event);
    }

    /// Advance the deterministic clock by `dt`.
    pub fn advance_time(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Set the deterministic clock to an absolute time (never backwards).
    pub fn set_time(&mut self, now: Duration) {
        self.clock.set(now);
    }

    /// Current host time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now_mono()
    }

    /// Fire timers that fell due before this step, process every queued
    /// event in arrival order, then fire timers armed by those events.
    pub fn step(&mut self) -> Result<StepResult, WebHostError> {
        let now = self.now();
        let before = self.transitions.len();
        let mut events_processed: u32 = 0;
        let mut events_dropped: u32 = 0;

        // Overdue timers precede every event queued since the last step.
        self.fire_due_timers(now);

        while let Some(event) = self.events.read_event() {
            events_processed += 1;
            if let Err(err) = self.handle_event(event, now) {
                warn!(error = %err, "event dropped");
                events_dropped += 1;
            }
        }

        self.fire_due_timers(now);

        self.frames = self
            .overlays
            .iter()
            .filter(|o| o.state().is_mounted())
            .map(|o| o.frame(now))
            .collect();
        self.step_idx += 1;

        Ok(StepResult {
            events_processed,
            events_dropped,
            transitions: (self.transitions.len() - before) as u32,
            step_idx: self.step_idx,
            mounted: self.frames.len(),
            next_deadline: self.next_deadline(),
        })
    }

    /// Earliest pending timer across all overlays.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.overlays.iter().filter_map(Overlay::next_deadline).min()
    }

    /// Frames of mounted overlays after the last step, in registration order.
    #[must_use]
    pub fn frames(&self) -> &[OverlayFrame] {
        &self.frames
    }

    /// Transitions since the last [`take_transitions`](Self::take_transitions),
    /// in the order they happened.
    #[must_use]
    pub fn transitions(&self) -> &[HostTransition] {
        &self.transitions
    }

    /// Drain the transition log.
    pub fn take_transitions(&mut self) -> Vec<HostTransition> {
        std::mem::take(&mut self.transitions)
    }

    /// Viewport size last reported by the host.
    #[must_use]
    pub fn viewport_size(&self) -> Size {
        self.events.size()
    }

    /// The in-memory document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Shared page services.
    #[must_use]
    pub fn services(&self) -> &OverlayServices {
        &self.services
    }

    /// Host-wide presentation options.
    #[must_use]
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Look up a registered overlay.
    pub fn overlay(&self, id: OverlayId) -> Result<&Overlay, WebHostError> {
        self.index_of(id)
            .map(|idx| &self.overlays[idx])
            .ok_or(WebHostError::UnknownOverlay(id))
    }

    /// Lifecycle state of a registered overlay.
    pub fn state(&self, id: OverlayId) -> Result<OverlayState, WebHostError> {
        self.overlay(id).map(Overlay::state)
    }

    fn index_of(&self, id: OverlayId) -> Option<usize> {
        self.overlays.iter().position(|o| o.id() == id)
    }

    fn overlay_mut(&mut self, id: OverlayId) -> Result<&mut Overlay, WebHostError> {
        let idx = self.index_of(id).ok_or(WebHostError::UnknownOverlay(id))?;
        Ok(&mut self.overlays[idx])
    }

    /// Topmost overlay whose latest intent is "open".
    fn topmost_open(&self) -> Option<OverlayId> {
        self.document.portal_nodes().into_iter().rev().find(|id| {
            self.overlay(*id)
                .is_ok_and(|o| o.state().is_open_intent())
        })
    }

    fn handle_event(&mut self, event: Event, now: Duration) -> Result<(), WebHostError> {
        let change = match event {
            Event::Open(id) => self.overlay_mut(id)?.open(now).map(|c| (id, c)),
            Event::Close(id) => self
                .overlay_mut(id)?
                .dismiss(DismissReason::CloseButton, now)
                .map(|c| (id, c)),
            Event::Toggle(id) => self.overlay_mut(id)?.toggle(now).map(|c| (id, c)),
            Event::BackdropClick(id) => self
                .overlay_mut(id)?
                .dismiss(DismissReason::Backdrop, now)
                .map(|c| (id, c)),
            // Escape only ever reaches the topmost open overlay; if that one
            // ignores Escape, nothing underneath closes either.
            Event::Key(KeyCode::Escape) => match self.topmost_open() {
                Some(id) => self
                    .overlay_mut(id)?
                    .dismiss(DismissReason::Escape, now)
                    .map(|c| (id, c)),
                None => None,
            },
            Event::Key(_) | Event::Tick => None,
            Event::Resize { width, height } => {
                self.services.viewport.resize(Size::new(width, height));
                for overlay in &mut self.overlays {
                    overlay.on_viewport_resize();
                }
                None
            }
            Event::Scroll { overlay, metrics } => {
                self.overlay_mut(overlay)?.on_scroll(metrics);
                None
            }
            Event::Measure { overlay, metrics } => {
                self.overlay_mut(overlay)?.on_measure(metrics);
                None
            }
        };
        if let Some((id, change)) = change {
            self.record(id, change);
        }
        Ok(())
    }

    fn fire_due_timers(&mut self, now: Duration) {
        for idx in 0..self.overlays.len() {
            while let Some(change) = self.overlays[idx].poll(now) {
                let id = self.overlays[idx].id();
                self.record(id, change);
            }
        }
    }

    fn record(&mut self, overlay: OverlayId, change: LifecycleChange) {
        self.transitions.push(HostTransition { overlay, change });
    }
}

impl std::fmt::Debug for StepHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepHost")
            .field("now", &self.now())
            .field("overlays", &self.overlays.len())
            .field("transitions", &self.transitions.len())
            .field("step_idx", &self.step_idx)
            .finish()
    }
}
