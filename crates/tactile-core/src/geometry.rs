#![forbid(unsafe_code)]

//! Geometric and timing primitives shared by the gesture session and the
//! pull-refresh controller.
//!
//! Everything here is a pure function over [`ContactPoint`] snapshots.

use crate::event::SwipeDirection;

/// Immutable snapshot of one physical contact at one instant.
///
/// Coordinates are in CSS-style pixels, timestamps in milliseconds on the
/// host's monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "event-trace", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactPoint {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: u64,
}

impl ContactPoint {
    /// Create a new contact point.
    #[must_use]
    pub const fn new(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self { x, y, timestamp_ms }
    }

    /// Euclidean distance to another point, ignoring time.
    #[inline]
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        distance(self, other)
    }

    /// Milliseconds elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    #[must_use]
    pub const fn elapsed_since(self, earlier: Self) -> u64 {
        self.timestamp_ms.saturating_sub(earlier.timestamp_ms)
    }
}

/// Euclidean distance between two contacts.
#[inline]
#[must_use]
pub fn distance(a: ContactPoint, b: ContactPoint) -> f64 {
    (b.x - a.x).hypot(b.y - a.y)
}

/// `value >= threshold`, treating NaN as never reaching the threshold.
#[inline]
#[must_use]
pub fn reaches(value: f64, threshold: f64) -> bool {
    value >= threshold
}

/// Ratio of two contact-pair spans, or `None` when the baseline span is
/// degenerate (zero or non-finite).
#[must_use]
pub fn span_ratio(
    baseline: (ContactPoint, ContactPoint),
    current: (ContactPoint, ContactPoint),
) -> Option<f64> {
    let start = distance(baseline.0, baseline.1);
    if !start.is_finite() || start <= f64::EPSILON {
        return None;
    }
    let scale = distance(current.0, current.1) / start;
    scale.is_finite().then_some(scale)
}

/// Dominant swipe direction for a displacement.
///
/// Horizontal wins only when `|dx| > |dy|` strictly; a tie resolves to the
/// vertical axis.
#[must_use]
pub fn swipe_direction(dx: f64, dy: f64) -> SwipeDirection {
    if dx.abs() > dy.abs() {
        if dx > 0.0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        }
    } else if dy > 0.0 {
        SwipeDirection::Down
    } else {
        SwipeDirection::Up
    }
}

/// Pull progress in `[0, 1]` for a drag of `pulled` px against `threshold`.
#[must_use]
pub fn pull_progress(pulled: f64, threshold: f64) -> f64 {
    if pulled <= 0.0 || threshold <= 0.0 {
        return 0.0;
    }
    (pulled / threshold).min(1.0)
}
