#![forbid(unsafe_code)]

//! Core: host clock, events, animation curves, and overlay configuration.

pub mod animation;
pub mod backend;
pub mod config;
pub mod event;
pub mod geometry;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, warn};
