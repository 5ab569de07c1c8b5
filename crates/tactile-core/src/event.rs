#![forbid(unsafe_code)]

//! Inbound contact events and outbound semantic gestures.
//!
//! [`ContactEvent`] is the shape a platform event source delivers (one per
//! touchstart / touchmove / touchend / touchcancel). [`Gesture`] is what the
//! [`GestureSession`](crate::gesture::GestureSession) hands back to the
//! application.
//!
//! # Invariants
//! 1. A `Start` or `Move` event carries the full list of contacts currently
//!    down, ordered by contact index.
//! 2. An `End` event carries the released point separately, since the lifted
//!    finger is no longer part of the active list.
//! 3. `PinchZoom` scale is always finite and non-negative.

use crate::geometry::ContactPoint;

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// Lifecycle phase of an inbound contact event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "event-trace", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "event-trace", serde(rename_all = "snake_case"))]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// One contact-lifecycle event from the platform.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "event-trace", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactEvent {
    pub phase: TouchPhase,
    /// Contacts currently down, ordered by contact index.
    #[cfg_attr(feature = "event-trace", serde(default))]
    pub contacts: Vec<ContactPoint>,
    /// The lifted contact, for `End` events.
    #[cfg_attr(
        feature = "event-trace",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub released: Option<ContactPoint>,
}

impl ContactEvent {
    /// A start event with the given contact set.
    #[must_use]
    pub fn start(contacts: impl Into<Vec<ContactPoint>>) -> Self {
        Self {
            phase: TouchPhase::Start,
            contacts: contacts.into(),
            released: None,
        }
    }

    /// A move event with the given contact set.
    #[must_use]
    pub fn moved(contacts: impl Into<Vec<ContactPoint>>) -> Self {
        Self {
            phase: TouchPhase::Move,
            contacts: contacts.into(),
            released: None,
        }
    }

    /// An end event for a lifted contact, with no contacts left down.
    #[must_use]
    pub fn end(released: ContactPoint) -> Self {
        Self {
            phase: TouchPhase::End,
            contacts: Vec::new(),
            released: Some(released),
        }
    }

    /// A platform cancellation.
    #[must_use]
    pub fn cancel() -> Self {
        Self {
            phase: TouchPhase::Cancel,
            contacts: Vec::new(),
            released: None,
        }
    }

    /// Timestamp of the event: the released point for `End`, otherwise the
    /// latest contact. `None` for cancellations without contacts.
    #[must_use]
    pub fn timestamp_ms(&self) -> Option<u64> {
        self.released
            .iter()
            .chain(self.contacts.iter())
            .map(|p| p.timestamp_ms)
            .max()
    }
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

/// Cardinal direction for swipe gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "event-trace", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "event-trace", serde(rename_all = "snake_case"))]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    Right,
}

impl SwipeDirection {
    /// Returns true for vertical directions.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Returns true for horizontal directions.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Semantic gesture emitted by a session.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "event-trace", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "event-trace", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Gesture {
    /// A single tap, confirmed once the double-tap window closed.
    Tap { point: ContactPoint },
    /// A second tap inside the double-tap window.
    DoubleTap { point: ContactPoint },
    /// A stationary single contact held past the long-press delay.
    LongPress { point: ContactPoint },
    /// A quick directional flick.
    Swipe {
        direction: SwipeDirection,
        start: ContactPoint,
        end: ContactPoint,
    },
    /// Two-contact span relative to the span at lifecycle start.
    PinchZoom { scale: f64 },
}

impl Gesture {
    /// Terminal gestures end classification for their lifecycle. Pinch is
    /// continuous.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::PinchZoom { .. })
    }

    /// Short stable name, used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Tap { .. } => "tap",
            Self::DoubleTap { .. } => "double_tap",
            Self::LongPress { .. } => "long_press",
            Self::Swipe {
                direction: SwipeDirection::Left,
                ..
            } => "swipe_left",
            Self::Swipe {
                direction: SwipeDirection::Right,
                ..
            } => "swipe_right",
            Self::Swipe {
                direction: SwipeDirection::Up,
                ..
            } => "swipe_up",
            Self::Swipe {
                direction: SwipeDirection::Down,
                ..
            } => "swipe_down",
            Self::PinchZoom { .. } => "pinch_zoom",
        }
    }
}
