#![forbid(unsafe_code)]

//! Berth public facade crate.
//!
//! Re-exports the overlay engine from its internal crates and offers a
//! lightweight prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use berth_core::animation::{AnimatedProperty, Easing, TransitionSpec, Tween};
pub use berth_core::backend::{
    HostClock, MonotonicClock, PortalHost, StylePriority, StyleSink, StyleTarget, StyleTargets,
};
pub use berth_core::config::{ConfigError, OverlayConfig};
pub use berth_core::event::{Event, KeyCode, OverlayId};
pub use berth_core::geometry::{ScrollMetrics, Size};

// --- Layout re-exports -----------------------------------------------------

pub use berth_layout::{Breakpoint, ContentBounds, ViewportClass};

// --- Runtime re-exports ----------------------------------------------------

pub use berth_runtime::{
    Observable, ScrollLock, ScrollLockGuard, Subscription, Timer, TimerToken, Viewport,
};

// --- Overlay re-exports ----------------------------------------------------

pub use berth_overlay::{
    DismissReason, LifecycleChange, LifecycleController, LifecycleTimings, Overlay,
    OverlayFrame, OverlayOptions, OverlayServices, OverlayState, ScrollIndicator, Surface,
    SurfaceSelector, Variant,
};

// --- Web host re-exports ---------------------------------------------------

#[cfg(feature = "web")]
pub use berth_web::WebHostError;
#[cfg(feature = "web")]
pub use berth_web::document::Document;
#[cfg(feature = "web")]
pub use berth_web::session_record::{SessionRecorder, SessionTrace, replay};
#[cfg(feature = "web")]
pub use berth_web::step_host::{HostTransition, StepHost, StepResult};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Berth hosts.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Presentation options out of range.
    Config(ConfigError),
    /// Headless host failure.
    #[cfg(feature = "web")]
    Host(WebHostError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            #[cfg(feature = "web")]
            Self::Host(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            #[cfg(feature = "web")]
            Self::Host(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

#[cfg(feature = "web")]
impl From<WebHostError> for Error {
    fn from(err: WebHostError) -> Self {
        Self::Host(err)
    }
}

/// Standard result type for Berth APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Build a headless host from environment-configured, validated options.
#[cfg(feature = "web")]
pub fn host_from_env(width: u32, height: u32) -> Result<StepHost> {
    let config = OverlayConfig::from_env().validate()?;
    Ok(StepHost::new(config, width, height))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DismissReason, Error, Event, KeyCode, Overlay, OverlayConfig, OverlayFrame, OverlayId,
        OverlayOptions, OverlayServices, OverlayState, Result, ScrollLock, ScrollMetrics, Size,
        Surface, Variant, Viewport,
    };

    #[cfg(feature = "web")]
    pub use crate::{Document, StepHost};

    pub use crate::{core, layout, overlay, runtime};
}

pub use berth_core as core;
pub use berth_layout as layout;
pub use berth_overlay as overlay;
pub use berth_runtime as runtime;
#[cfg(feature = "web")]
pub use berth_web as web;
