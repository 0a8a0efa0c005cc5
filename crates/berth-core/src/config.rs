#![forbid(unsafe_code)]

//! Overlay presentation options.
//!
//! All tuning is numeric and fixed at construction time. Hosts may override
//! any of it through environment variables (useful for slowing animations
//! down while debugging):
//!
//! | Variable                  | Field                   | Unit     |
//! |---------------------------|-------------------------|----------|
//! | `BERTH_OPEN_DELAY_MS`     | `open_delay`            | ms       |
//! | `BERTH_TRANSITION_MS`     | `transition`            | ms       |
//! | `BERTH_MAX_CONTENT_HEIGHT`| `max_content_height`    | fraction |
//! | `BERTH_NEAR_BOTTOM_PX`    | `near_bottom_threshold` | px       |
//! | `BERTH_SETTLE_DELAY_MS`   | `settle_delay`          | ms       |
//! | `BERTH_NARROW_BELOW_PX`   | `narrow_below`          | px       |
//! | `BERTH_REDUCED_MOTION`    | `reduced_motion`        | bool     |

use core::fmt;
use core::time::Duration;

const ENV_OPEN_DELAY_MS: &str = "BERTH_OPEN_DELAY_MS";
const ENV_TRANSITION_MS: &str = "BERTH_TRANSITION_MS";
const ENV_MAX_CONTENT_HEIGHT: &str = "BERTH_MAX_CONTENT_HEIGHT";
const ENV_NEAR_BOTTOM_PX: &str = "BERTH_NEAR_BOTTOM_PX";
const ENV_SETTLE_DELAY_MS: &str = "BERTH_SETTLE_DELAY_MS";
const ENV_NARROW_BELOW_PX: &str = "BERTH_NARROW_BELOW_PX";
const ENV_REDUCED_MOTION: &str = "BERTH_REDUCED_MOTION";

/// Presentation options shared by every overlay in a host.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayConfig {
    /// Delay between inserting the node and flipping to the shown value.
    /// Default: 50ms
    pub open_delay: Duration,
    /// CSS transition duration; the node is removed this long after close.
    /// Default: 300ms
    pub transition: Duration,
    /// Maximum content height as a fraction of the viewport height.
    /// Default: 0.9
    pub max_content_height: f64,
    /// Distance from the end of the content that counts as "at the bottom".
    /// Default: 10px
    pub near_bottom_threshold: f64,
    /// Delay after mount before the first scroll-indicator measurement.
    /// Default: 100ms
    pub settle_delay: Duration,
    /// Viewports narrower than this use the bottom-drawer presentation.
    /// Default: 768px
    pub narrow_below: u32,
    /// Skip the exit animation (unmount on the next poll after close).
    /// Default: false
    pub reduced_motion: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            open_delay: Duration::from_millis(50),
            transition: Duration::from_millis(300),
            max_content_height: 0.9,
            near_bottom_threshold: 10.0,
            settle_delay: Duration::from_millis(100),
            narrow_below: 768,
            reduced_motion: false,
        }
    }
}

impl OverlayConfig {
    /// Defaults with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides from a custom environment lookup (for tests).
    ///
    /// Unparseable values are ignored and the default is kept.
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(ms) = env_parse::<u64, _>(&get_env, ENV_OPEN_DELAY_MS) {
            config.open_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = env_parse::<u64, _>(&get_env, ENV_TRANSITION_MS) {
            config.transition = Duration::from_millis(ms);
        }
        if let Some(fraction) = env_parse::<f64, _>(&get_env, ENV_MAX_CONTENT_HEIGHT) {
            config.max_content_height = fraction;
        }
        if let Some(px) = env_parse::<f64, _>(&get_env, ENV_NEAR_BOTTOM_PX) {
            config.near_bottom_threshold = px;
        }
        if let Some(ms) = env_parse::<u64, _>(&get_env, ENV_SETTLE_DELAY_MS) {
            config.settle_delay = Duration::from_millis(ms);
        }
        if let Some(px) = env_parse::<u32, _>(&get_env, ENV_NARROW_BELOW_PX) {
            config.narrow_below = px;
        }
        if let Some(value) = get_env(ENV_REDUCED_MOTION) {
            match parse_bool(&value) {
                Some(flag) => config.reduced_motion = flag,
                None => {
                    crate::warn!(key = ENV_REDUCED_MOTION, value = %value, "ignoring unparseable override");
                }
            }
        }
        config
    }

    /// Set the open delay.
    #[must_use]
    pub fn open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = delay;
        self
    }

    /// Set the transition duration.
    #[must_use]
    pub fn transition(mut self, duration: Duration) -> Self {
        self.transition = duration;
        self
    }

    /// Set the maximum content height fraction.
    #[must_use]
    pub fn max_content_height(mut self, fraction: f64) -> Self {
        self.max_content_height = fraction;
        self
    }

    /// Set the near-bottom threshold in pixels.
    #[must_use]
    pub fn near_bottom_threshold(mut self, px: f64) -> Self {
        self.near_bottom_threshold = px;
        self
    }

    /// Set the scroll-indicator settle delay.
    #[must_use]
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Set the narrow-viewport breakpoint.
    #[must_use]
    pub fn narrow_below(mut self, px: u32) -> Self {
        self.narrow_below = px;
        self
    }

    /// Enable or disable reduced motion.
    #[must_use]
    pub fn reduced_motion(mut self, enabled: bool) -> Self {
        self.reduced_motion = enabled;
        self
    }

    /// Exit animation length after reduced motion is applied.
    #[must_use]
    pub fn effective_transition(&self) -> Duration {
        if self.reduced_motion {
            Duration::ZERO
        } else {
            self.transition
        }
    }

    /// Check that every option is within range.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if !(self.max_content_height > 0.0 && self.max_content_height <= 1.0) {
            return Err(ConfigError::MaxContentHeight(self.max_content_height));
        }
        if !self.near_bottom_threshold.is_finite() || self.near_bottom_threshold < 0.0 {
            return Err(ConfigError::NearBottomThreshold(self.near_bottom_threshold));
        }
        if self.narrow_below == 0 {
            return Err(ConfigError::ZeroBreakpoint);
        }
        Ok(self)
    }
}

fn env_parse<T, F>(get_env: &F, key: &'static str) -> Option<T>
where
    T: core::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = get_env(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            crate::warn!(key, value = %raw, "ignoring unparseable override");
            None
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Out-of-range presentation option.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `max_content_height` must be in (0, 1].
    MaxContentHeight(f64),
    /// `near_bottom_threshold` must be finite and non-negative.
    NearBottomThreshold(f64),
    /// `narrow_below` must be positive.
    ZeroBreakpoint,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxContentHeight(v) => {
                write!(f, "max content height must be in (0, 1], got {v}")
            }
            Self::NearBottomThreshold(v) => {
                write!(f, "near-bottom threshold must be a non-negative number, got {v}")
            }
            Self::ZeroBreakpoint => f.write_str("narrow breakpoint must be positive"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_values() {
        let config = OverlayConfig::default();
        assert_eq!(config.open_delay, Duration::from_millis(50));
        assert_eq!(config.transition, Duration::from_millis(300));
        assert_eq!(config.max_content_height, 0.9);
        assert_eq!(config.near_bottom_threshold, 10.0);
        assert_eq!(config.settle_delay, Duration::from_millis(100));
        assert_eq!(config.narrow_below, 768);
        assert!(!config.reduced_motion);
    }

    #[test]
    fn env_overrides_apply() {
        let config = OverlayConfig::from_env_with(env(&[
            (ENV_OPEN_DELAY_MS, "20"),
            (ENV_TRANSITION_MS, " 500 "),
            (ENV_MAX_CONTENT_HEIGHT, "0.75"),
            (ENV_NEAR_BOTTOM_PX, "4"),
            (ENV_SETTLE_DELAY_MS, "0"),
            (ENV_NARROW_BELOW_PX, "640"),
            (ENV_REDUCED_MOTION, "yes"),
        ]));
        assert_eq!(config.open_delay, Duration::from_millis(20));
        assert_eq!(config.transition, Duration::from_millis(500));
        assert_eq!(config.max_content_height, 0.75);
        assert_eq!(config.near_bottom_threshold, 4.0);
        assert_eq!(config.settle_delay, Duration::ZERO);
        assert_eq!(config.narrow_below, 640);
        assert!(config.reduced_motion);
    }

    #[test]
    fn garbage_env_values_keep_defaults() {
        let config = OverlayConfig::from_env_with(env(&[
            (ENV_TRANSITION_MS, "slow"),
            (ENV_REDUCED_MOTION, "maybe"),
        ]));
        assert_eq!(config, OverlayConfig::default());
    }

    #[test]
    fn unparseable_flag_keeps_other_overrides() {
        let config = OverlayConfig::from_env_with(env(&[
            (ENV_REDUCED_MOTION, "sometimes"),
            (ENV_TRANSITION_MS, "120"),
        ]));
        assert!(!config.reduced_motion);
        assert_eq!(config.transition, Duration::from_millis(120));
    }

    #[test]
    fn builder_chain() {
        let config = OverlayConfig::default()
            .open_delay(Duration::from_millis(10))
            .transition(Duration::from_millis(200))
            .narrow_below(600)
            .reduced_motion(true);
        assert_eq!(config.open_delay, Duration::from_millis(10));
        assert_eq!(config.transition, Duration::from_millis(200));
        assert_eq!(config.narrow_below, 600);
        assert_eq!(config.effective_transition(), Duration::ZERO);
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(OverlayConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range() {
        assert_eq!(
            OverlayConfig::default().max_content_height(1.5).validate(),
            Err(ConfigError::MaxContentHeight(1.5))
        );
        assert_eq!(
            OverlayConfig::default().max_content_height(0.0).validate(),
            Err(ConfigError::MaxContentHeight(0.0))
        );
        assert!(matches!(
            OverlayConfig::default()
                .near_bottom_threshold(f64::NAN)
                .validate(),
            Err(ConfigError::NearBottomThreshold(_))
        ));
        assert_eq!(
            OverlayConfig::default().narrow_below(0).validate(),
            Err(ConfigError::ZeroBreakpoint)
        );
    }

    #[test]
    fn config_error_display() {
        let msg = ConfigError::MaxContentHeight(2.0).to_string();
        assert!(msg.contains("(0, 1]"));
        assert!(msg.contains('2'));
    }
}
