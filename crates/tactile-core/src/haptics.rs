#![forbid(unsafe_code)]

//! Haptic feedback collaborator.
//!
//! The engine only ever *requests* a vibration pattern. Platforms without a
//! vibration motor use [`NoHaptics`], which reports every request as
//! unsupported; nothing in gesture resolution waits on the result, and a
//! failed request is only logged.

use crate::error::HapticsError;

/// Pulse for a confirmed single tap.
pub const TAP_PATTERN: &[u32] = &[10];
/// Two short pulses for a double tap.
pub const DOUBLE_TAP_PATTERN: &[u32] = &[10, 40, 10];
/// One firm pulse when a long press triggers.
pub const LONG_PRESS_PATTERN: &[u32] = &[40];
/// Pulse for a recognized swipe.
pub const SWIPE_PATTERN: &[u32] = &[15];
/// Confirmation after a successful pull-to-refresh.
pub const REFRESH_DONE_PATTERN: &[u32] = &[10, 50, 10];

/// Fire-and-forget vibration sink. `pattern_ms` alternates vibrate / pause
/// durations in milliseconds.
///
/// An `Err` is informational only: callers log it and carry on.
pub trait Haptics {
    fn vibrate(&mut self, pattern_ms: &[u32]) -> Result<(), HapticsError>;
}

/// Haptics for platforms without a vibration device.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn vibrate(&mut self, _pattern_ms: &[u32]) -> Result<(), HapticsError> {
        Err(HapticsError::Unsupported)
    }
}

impl<F> Haptics for F
where
    F: FnMut(&[u32]),
{
    fn vibrate(&mut self, pattern_ms: &[u32]) -> Result<(), HapticsError> {
        self(pattern_ms);
        Ok(())
    }
}
