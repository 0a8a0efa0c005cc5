#![forbid(unsafe_code)]

//! Logging and tracing support.
//!
//! Overlay crates log through `berth_core::debug!` and friends. With the
//! `tracing` feature those are the real `tracing` macros; without it they
//! expand to nothing, so lifecycle code carries no logging cost.
//!
//! The `tracing-json` feature adds [`init_json_logging`], which installs a
//! JSON formatter filtered by the [`LOG_ENV`] environment variable.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, info, trace, warn};

/// Environment variable holding the `EnvFilter` directive for [`init_json_logging`].
pub const LOG_ENV: &str = "BERTH_LOG";

/// Default filter when [`LOG_ENV`] is unset or unparseable.
pub const DEFAULT_FILTER: &str = "berth=info";

/// Install a global JSON subscriber.
///
/// Returns `false` when a global subscriber was already installed (for
/// example by the embedding application), in which case nothing changes.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .try_init()
        .is_ok()
}

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op debug macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op info macro when tracing is disabled.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op warn macro when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    /// No-op debug_span macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// Stand-in span when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Enter the span (does nothing).
    pub fn entered(self) -> NoopGuard {
        NoopGuard
    }
}

/// Guard returned by [`NoopSpan::entered`].
#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct NoopGuard;

#[cfg(all(test, feature = "tracing-json"))]
mod tests {
    use super::*;

    #[test]
    fn json_logging_installs_once() {
        let _ = init_json_logging();
        assert!(!init_json_logging());
    }
}
