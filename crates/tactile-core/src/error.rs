#![forbid(unsafe_code)]

//! Error types for configuration, refresh, and haptic collaborators.

use thiserror::Error;

/// Errors raised while building or loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[cfg(feature = "config-file")]
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-file")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[cfg(feature = "config-file")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConfigError {
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Failure reported by an injected refresh operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    #[error("refresh failed: {message}")]
    Failed { message: String },

    #[error("refresh was abandoned before completing")]
    Cancelled,
}

impl RefreshError {
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// A haptic request the platform could not honor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HapticsError {
    #[error("no vibration device available")]
    Unsupported,

    #[error("vibration request rejected: {message}")]
    Rejected { message: String },
}

impl From<futures::channel::oneshot::Canceled> for RefreshError {
    fn from(_: futures::channel::oneshot::Canceled) -> Self {
        Self::Cancelled
    }
}
