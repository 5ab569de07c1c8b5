#![forbid(unsafe_code)]

//! Immutable tunables for the gesture session and the pull-refresh
//! controller.
//!
//! Both components take their config by value at construction and never
//! mutate it. The long-press delay and the double-tap window are fixed and
//! exposed as constants rather than fields.
//!
//! # Loading
//!
//! With the `config-file` feature the tunables can be read from TOML or JSON:
//!
//! ```toml
//! [gesture]
//! min_swipe_distance = 60.0
//! max_gesture_duration_ms = 800
//! tap_move_threshold = 8.0
//!
//! [pull_refresh]
//! pull_threshold = 96.0
//! ```
//!
//! ```rust,ignore
//! let config = TactileConfig::from_toml_file("tactile.toml")?;
//! ```
//!
//! Missing keys fall back to [`Default`], and every loaded config is
//! validated before it is returned.

#[cfg(feature = "config-file")]
use std::path::Path;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::error::ConfigError;

/// Hold time before a stationary single contact becomes a long press.
pub const LONG_PRESS_DELAY: Duration = Duration::from_millis(500);

/// Window after a tap during which a second tap counts as a double tap.
pub const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(300);

// ---------------------------------------------------------------------------
// GestureConfig
// ---------------------------------------------------------------------------

/// Thresholds for classifying a contact lifecycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct GestureConfig {
    /// Minimum travel (px) for a release to count as a swipe (default: 50).
    pub min_swipe_distance: f64,
    /// Presses lasting this long or longer never classify (default: 1000ms).
    #[cfg_attr(
        feature = "config-file",
        serde(
            rename = "max_gesture_duration_ms",
            serialize_with = "serialize_millis",
            deserialize_with = "deserialize_millis"
        )
    )]
    pub max_gesture_duration: Duration,
    /// Maximum travel (px) for a release to still count as a tap (default: 10).
    pub tap_move_threshold: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            min_swipe_distance: 50.0,
            max_gesture_duration: Duration::from_millis(1000),
            tap_move_threshold: 10.0,
        }
    }
}

impl GestureConfig {
    /// Long-press delay (fixed at 500ms).
    #[inline]
    #[must_use]
    pub const fn long_press_delay(&self) -> Duration {
        LONG_PRESS_DELAY
    }

    /// Double-tap window (fixed at 300ms).
    #[inline]
    #[must_use]
    pub const fn double_tap_window(&self) -> Duration {
        DOUBLE_TAP_WINDOW
    }

    /// Check every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_px("min_swipe_distance", self.min_swipe_distance)?;
        positive_px("tap_move_threshold", self.tap_move_threshold)?;
        if self.max_gesture_duration.is_zero() {
            return Err(ConfigError::invalid(
                "max_gesture_duration",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PullRefreshConfig
// ---------------------------------------------------------------------------

/// Tunables for the drag-to-refresh controller.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct PullRefreshConfig {
    /// Downward pull (px) that arms a refresh on release (default: 80).
    pub pull_threshold: f64,
}

impl Default for PullRefreshConfig {
    fn default() -> Self {
        Self {
            pull_threshold: 80.0,
        }
    }
}

impl PullRefreshConfig {
    /// Check every field is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_px("pull_threshold", self.pull_threshold)
    }
}

// ---------------------------------------------------------------------------
// TactileConfig
// ---------------------------------------------------------------------------

/// Both components' tunables, as loaded from a single file.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct TactileConfig {
    pub gesture: GestureConfig,
    pub pull_refresh: PullRefreshConfig,
}

impl TactileConfig {
    /// Validate both sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gesture.validate()?;
        self.pull_refresh.validate()
    }

    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }
}

fn positive_px(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::invalid(field, format!("{value} is not finite")));
    }
    if value <= 0.0 {
        return Err(ConfigError::invalid(
            field,
            format!("{value} must be greater than zero"),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Serde helpers for Duration
// ---------------------------------------------------------------------------

#[cfg(feature = "config-file")]
fn serialize_millis<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    serializer.serialize_u64(ms)
}

#[cfg(feature = "config-file")]
fn deserialize_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let ms = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(TactileConfig::default().validate().is_ok());
        let g = GestureConfig::default();
        assert_eq!(g.long_press_delay(), Duration::from_millis(500));
        assert_eq!(g.double_tap_window(), Duration::from_millis(300));
        assert_eq!(PullRefreshConfig::default().pull_threshold, 80.0);
    }

    #[test]
    fn rejects_non_positive_thresholds() {
        let config = PullRefreshConfig { pull_threshold: 0.0 };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "pull_threshold",
                ..
            }
        ));

        let config = GestureConfig {
            tap_move_threshold: f64::NAN,
            ..GestureConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_duration() {
        let config = GestureConfig {
            max_gesture_duration: Duration::ZERO,
            ..GestureConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[cfg(feature = "config-file")]
    #[test]
    fn toml_partial_overrides_keep_defaults() {
        let config = TactileConfig::from_toml_str(
            "[gesture]\nmax_gesture_duration_ms = 750\n\n[pull_refresh]\npull_threshold = 120.0\n",
        )
        .unwrap();
        assert_eq!(
            config.gesture.max_gesture_duration,
            Duration::from_millis(750)
        );
        assert_eq!(config.gesture.min_swipe_distance, 50.0);
        assert_eq!(config.pull_refresh.pull_threshold, 120.0);
    }
}
