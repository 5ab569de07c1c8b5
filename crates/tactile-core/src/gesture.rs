#![forbid(unsafe_code)]

//! Gesture recognition: classifies a contact lifecycle into one semantic
//! gesture.
//!
//! [`GestureSession`] is bound to one interactive element. It consumes the
//! start → move* → end | cancel events of each contact lifecycle and emits
//! [`Gesture`]s through the registered [`GestureHandlers`]. Every operation
//! also returns the gestures it emitted, in order.
//!
//! # State Machine
//!
//! The session tracks two timers next to the open lifecycle:
//!
//! - **Long-press timer**: scheduled when exactly one contact goes down.
//!   Any move, end, or cancel before it fires forfeits the long press for
//!   that lifecycle.
//! - **Tap timer**: scheduled when a release qualifies as a tap. A second
//!   tap inside the window upgrades it to `DoubleTap` and cancels the timer;
//!   otherwise it fires `Tap`. It belongs to the tap, not to contact
//!   tracking, so later lifecycles leave it alone.
//!
//! Timers fire from [`GestureSession::advance`]. Every inbound event first
//! advances to its own timestamp, so a timer that came due before the event
//! is always delivered before the event is processed.
//!
//! # Invariants
//!
//! 1. A lifecycle emits at most one terminal gesture (tap, double-tap,
//!    long-press, swipe). `PinchZoom` is continuous and may repeat.
//! 2. A timer is never rescheduled without cancelling its predecessor, and a
//!    cancelled timer never fires.
//! 3. The contact set is frozen at lifecycle start. A new start event while a
//!    lifecycle is open supersedes it without emitting anything.
//! 4. After [`reset`](GestureSession::reset), no timers are pending and no
//!    lifecycle is open.
//!
//! # Failure Modes
//!
//! - Malformed input (a start with no contacts, a move whose contact list is
//!   empty, an end with no open lifecycle) drops the lifecycle and logs at
//!   `warn`. Nothing is ever returned as an error to the event dispatcher.
//! - A release at or beyond `max_gesture_duration` is a normal no-match.

use crate::config::GestureConfig;
use crate::error::ConfigError;
use crate::event::{ContactEvent, Gesture, SwipeDirection, TouchPhase};
use crate::geometry::{self, ContactPoint};
use crate::haptics::{self, Haptics, NoHaptics};
use crate::timer::{TimerSlot, millis};

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

type PointHandler = Box<dyn FnMut(ContactPoint)>;
type SwipeHandler = Box<dyn FnMut(ContactPoint, ContactPoint)>;
type ScaleHandler = Box<dyn FnMut(f64)>;

/// Optional application callbacks, one per gesture kind.
///
/// A missing handler silently drops that notification. Handlers are bound
/// once, when the session is built.
#[derive(Default)]
pub struct GestureHandlers {
    on_tap: Option<PointHandler>,
    on_double_tap: Option<PointHandler>,
    on_long_press: Option<PointHandler>,
    on_swipe_left: Option<SwipeHandler>,
    on_swipe_right: Option<SwipeHandler>,
    on_swipe_up: Option<SwipeHandler>,
    on_swipe_down: Option<SwipeHandler>,
    on_pinch_zoom: Option<ScaleHandler>,
}

impl GestureHandlers {
    /// No handlers registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn on_tap(mut self, f: impl FnMut(ContactPoint) + 'static) -> Self {
        self.on_tap = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_double_tap(mut self, f: impl FnMut(ContactPoint) + 'static) -> Self {
        self.on_double_tap = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_long_press(mut self, f: impl FnMut(ContactPoint) + 'static) -> Self {
        self.on_long_press = Some(Box::new(f));
        self
    }

    /// Called with the start and release points of a leftward swipe.
    #[must_use]
    pub fn on_swipe_left(mut self, f: impl FnMut(ContactPoint, ContactPoint) + 'static) -> Self {
        self.on_swipe_left = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_swipe_right(mut self, f: impl FnMut(ContactPoint, ContactPoint) + 'static) -> Self {
        self.on_swipe_right = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_swipe_up(mut self, f: impl FnMut(ContactPoint, ContactPoint) + 'static) -> Self {
        self.on_swipe_up = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn on_swipe_down(mut self, f: impl FnMut(ContactPoint, ContactPoint) + 'static) -> Self {
        self.on_swipe_down = Some(Box::new(f));
        self
    }

    /// Called with the current span divided by the span at lifecycle start.
    #[must_use]
    pub fn on_pinch_zoom(mut self, f: impl FnMut(f64) + 'static) -> Self {
        self.on_pinch_zoom = Some(Box::new(f));
        self
    }

    fn dispatch(&mut self, gesture: &Gesture) {
        match *gesture {
            Gesture::Tap { point } => {
                if let Some(f) = self.on_tap.as_mut() {
                    f(point);
                }
            }
            Gesture::DoubleTap { point } => {
                if let Some(f) = self.on_double_tap.as_mut() {
                    f(point);
                }
            }
            Gesture::LongPress { point } => {
                if let Some(f) = self.on_long_press.as_mut() {
                    f(point);
                }
            }
            Gesture::Swipe {
                direction,
                start,
                end,
            } => {
                let slot = match direction {
                    SwipeDirection::Left => &mut self.on_swipe_left,
                    SwipeDirection::Right => &mut self.on_swipe_right,
                    SwipeDirection::Up => &mut self.on_swipe_up,
                    SwipeDirection::Down => &mut self.on_swipe_down,
                };
                if let Some(f) = slot.as_mut() {
                    f(start, end);
                }
            }
            Gesture::PinchZoom { scale } => {
                if let Some(f) = self.on_pinch_zoom.as_mut() {
                    f(scale);
                }
            }
        }
    }
}

impl std::fmt::Debug for GestureHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureHandlers")
            .field("on_tap", &self.on_tap.is_some())
            .field("on_double_tap", &self.on_double_tap.is_some())
            .field("on_long_press", &self.on_long_press.is_some())
            .field("on_swipe_left", &self.on_swipe_left.is_some())
            .field("on_swipe_right", &self.on_swipe_right.is_some())
            .field("on_swipe_up", &self.on_swipe_up.is_some())
            .field("on_swipe_down", &self.on_swipe_down.is_some())
            .field("on_pinch_zoom", &self.on_pinch_zoom.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// GestureSession
// ---------------------------------------------------------------------------

/// Stateful classifier for one element's contact lifecycles.
pub struct GestureSession {
    config: GestureConfig,
    handlers: GestureHandlers,
    haptics: Box<dyn Haptics>,

    // Open lifecycle
    active: Vec<ContactPoint>,
    resolved: bool,
    /// Contacts of an ended multi-contact lifecycle that have not lifted yet.
    lingering: usize,

    // Timers
    long_press: TimerSlot,
    tap: TimerSlot,
    last_tap: Option<ContactPoint>,
}

impl std::fmt::Debug for GestureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureSession")
            .field("contacts", &self.active.len())
            .field("resolved", &self.resolved)
            .field("lingering", &self.lingering)
            .field("long_press_pending", &self.long_press.is_pending())
            .field("tap_pending", &self.tap.is_pending())
            .finish()
    }
}

impl GestureSession {
    /// Create a session with the given configuration and handlers.
    ///
    /// The configuration is trusted as given; use [`try_new`](Self::try_new)
    /// to validate it first.
    #[must_use]
    pub fn new(config: GestureConfig, handlers: GestureHandlers) -> Self {
        Self {
            config,
            handlers,
            haptics: Box::new(NoHaptics),
            active: Vec::with_capacity(2),
            resolved: false,
            lingering: 0,
            long_press: TimerSlot::new(),
            tap: TimerSlot::new(),
            last_tap: None,
        }
    }

    /// Validate `config` and create a session.
    pub fn try_new(config: GestureConfig, handlers: GestureHandlers) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config, handlers))
    }

    /// Route haptic requests to `haptics` instead of dropping them.
    #[must_use]
    pub fn with_haptics(mut self, haptics: impl Haptics + 'static) -> Self {
        self.haptics = Box::new(haptics);
        self
    }

    /// Process one inbound platform event.
    pub fn handle(&mut self, event: &ContactEvent) -> Vec<Gesture> {
        match event.phase {
            TouchPhase::Start => self.on_contacts_start(&event.contacts),
            TouchPhase::Move => self.on_contacts_move(&event.contacts),
            TouchPhase::End => match event.released {
                Some(point) => self.on_contacts_end(point),
                None => {
                    tracing::warn!("contact end without a released point; dropping lifecycle");
                    self.reset_lifecycle();
                    Vec::new()
                }
            },
            TouchPhase::Cancel => {
                let out = event
                    .timestamp_ms()
                    .map(|now| self.advance(now))
                    .unwrap_or_default();
                self.on_contacts_cancel();
                out
            }
        }
    }

    /// Fire every timer due at or before `now_ms`, in deadline order.
    pub fn advance(&mut self, now_ms: u64) -> Vec<Gesture> {
        let mut out = Vec::new();
        self.fire_due(now_ms, &mut out);
        out
    }

    /// A new contact set went down.
    pub fn on_contacts_start(&mut self, points: &[ContactPoint]) -> Vec<Gesture> {
        let mut out = Vec::new();
        let Some(&first) = points.first() else {
            tracing::warn!("contact start without contacts; dropping lifecycle");
            self.reset_lifecycle();
            return out;
        };
        self.fire_due(latest(points), &mut out);

        if !self.active.is_empty() {
            tracing::debug!(
                previous = self.active.len(),
                current = points.len(),
                "contact set changed; starting a new lifecycle"
            );
        }
        self.long_press.cancel();
        self.active.clear();
        self.active.extend_from_slice(points);
        self.resolved = false;
        self.lingering = 0;

        if points.len() == 1 {
            self.long_press
                .schedule(first.timestamp_ms, self.config.long_press_delay());
        }
        out
    }

    /// The open contact set moved.
    pub fn on_contacts_move(&mut self, points: &[ContactPoint]) -> Vec<Gesture> {
        let mut out = Vec::new();
        if points.is_empty() {
            if !self.active.is_empty() {
                tracing::warn!("contact count dropped to zero without end; dropping lifecycle");
                self.reset_lifecycle();
            }
            return out;
        }
        self.fire_due(latest(points), &mut out);

        if self.active.is_empty() {
            tracing::trace!("move without an open lifecycle ignored");
            return out;
        }

        if self.long_press.cancel().is_some() {
            tracing::trace!("movement forfeits long press");
        }

        let baseline = match *self.active.as_slice() {
            [a0, a1] => Some((a0, a1)),
            _ => None,
        };
        if let (Some(baseline), &[p0, p1]) = (baseline, points) {
            match geometry::span_ratio(baseline, (p0, p1)) {
                Some(scale) => self.emit(Gesture::PinchZoom { scale }, &mut out),
                None => tracing::debug!("pinch baseline span is degenerate; skipping"),
            }
        }
        out
    }

    /// A contact lifted; `released` is where it left the surface.
    pub fn on_contacts_end(&mut self, released: ContactPoint) -> Vec<Gesture> {
        let mut out = Vec::new();
        self.fire_due(released.timestamp_ms, &mut out);

        if self.active.is_empty() {
            if self.lingering > 0 {
                self.lingering -= 1;
                tracing::trace!(remaining = self.lingering, "trailing contact lifted");
            } else {
                tracing::warn!("contact end without an open lifecycle");
                self.reset_lifecycle();
            }
            return out;
        }

        self.long_press.cancel();
        let active = std::mem::take(&mut self.active);
        let resolved = std::mem::replace(&mut self.resolved, false);

        let &[start] = active.as_slice() else {
            self.lingering = active.len().saturating_sub(1);
            tracing::trace!(contacts = active.len(), "multi-contact lifecycle ended");
            return out;
        };
        if resolved {
            return out;
        }

        let duration_ms = released.elapsed_since(start);
        let distance = geometry::distance(start, released);

        if duration_ms >= millis(self.config.max_gesture_duration) {
            tracing::trace!(duration_ms, "press too long to classify");
        } else if distance < self.config.tap_move_threshold {
            self.on_tap_candidate(released, &mut out);
        } else if geometry::reaches(distance, self.config.min_swipe_distance) {
            let direction = geometry::swipe_direction(released.x - start.x, released.y - start.y);
            self.emit(
                Gesture::Swipe {
                    direction,
                    start,
                    end: released,
                },
                &mut out,
            );
        } else {
            tracing::trace!(distance, "release between tap and swipe thresholds");
        }
        out
    }

    /// The platform interrupted the gesture. Emits nothing.
    pub fn on_contacts_cancel(&mut self) {
        self.long_press.cancel();
        self.tap.cancel();
        self.last_tap = None;
        self.active.clear();
        self.resolved = false;
        self.lingering = 0;
    }

    /// Reset all state to the idle baseline without emitting.
    pub fn reset(&mut self) {
        self.on_contacts_cancel();
    }

    /// Whether a contact lifecycle is open.
    #[inline]
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        !self.active.is_empty()
    }

    /// Contacts frozen at the start of the open lifecycle.
    #[inline]
    #[must_use]
    pub fn active_contacts(&self) -> &[ContactPoint] {
        &self.active
    }

    #[inline]
    #[must_use]
    pub fn has_pending_long_press(&self) -> bool {
        self.long_press.is_pending()
    }

    #[inline]
    #[must_use]
    pub fn has_pending_tap(&self) -> bool {
        self.tap.is_pending()
    }

    /// Earliest pending timer deadline; the host should call
    /// [`advance`](Self::advance) no later than this.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        match (self.long_press.deadline_ms(), self.tap.deadline_ms()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Get a reference to the current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Internal
// ---------------------------------------------------------------------------

impl GestureSession {
    fn on_tap_candidate(&mut self, released: ContactPoint, out: &mut Vec<Gesture>) {
        let window_ms = millis(self.config.double_tap_window());
        match self.last_tap {
            Some(previous) if released.elapsed_since(previous) < window_ms => {
                self.tap.cancel();
                self.last_tap = None;
                self.emit(Gesture::DoubleTap { point: released }, out);
            }
            _ => {
                self.last_tap = Some(released);
                self.tap
                    .schedule(released.timestamp_ms, self.config.double_tap_window());
            }
        }
    }

    fn fire_due(&mut self, now_ms: u64, out: &mut Vec<Gesture>) {
        let long_press_first = match (self.long_press.deadline_ms(), self.tap.deadline_ms()) {
            (Some(a), Some(b)) => a <= b,
            _ => true,
        };
        if long_press_first {
            self.fire_long_press(now_ms, out);
            self.fire_tap(now_ms, out);
        } else {
            self.fire_tap(now_ms, out);
            self.fire_long_press(now_ms, out);
        }
    }

    fn fire_long_press(&mut self, now_ms: u64, out: &mut Vec<Gesture>) {
        if self.long_press.fire_if_due(now_ms).is_none() {
            return;
        }
        if let &[point] = self.active.as_slice() {
            self.resolved = true;
            self.emit(Gesture::LongPress { point }, out);
        }
    }

    fn fire_tap(&mut self, now_ms: u64, out: &mut Vec<Gesture>) {
        if self.tap.fire_if_due(now_ms).is_none() {
            return;
        }
        if let Some(point) = self.last_tap.take() {
            self.emit(Gesture::Tap { point }, out);
        }
    }

    fn emit(&mut self, gesture: Gesture, out: &mut Vec<Gesture>) {
        let pattern = match gesture {
            Gesture::Tap { .. } => Some(haptics::TAP_PATTERN),
            Gesture::DoubleTap { .. } => Some(haptics::DOUBLE_TAP_PATTERN),
            Gesture::LongPress { .. } => Some(haptics::LONG_PRESS_PATTERN),
            Gesture::Swipe { .. } => Some(haptics::SWIPE_PATTERN),
            Gesture::PinchZoom { .. } => None,
        };
        if let Some(pattern) = pattern {
            if let Err(error) = self.haptics.vibrate(pattern) {
                tracing::debug!(%error, gesture = gesture.name(), "haptic request not delivered");
            }
            tracing::debug!(gesture = gesture.name(), "gesture recognized");
        }
        self.handlers.dispatch(&gesture);
        out.push(gesture);
    }

    /// Drop the open lifecycle; a pending tap belongs to an earlier
    /// lifecycle and survives.
    fn reset_lifecycle(&mut self) {
        self.long_press.cancel();
        self.active.clear();
        self.resolved = false;
        self.lingering = 0;
    }
}

fn latest(points: &[ContactPoint]) -> u64 {
    points.iter().map(|p| p.timestamp_ms).max().unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use web_time::Duration;

    fn pt(x: f64, y: f64, t: u64) -> ContactPoint {
        ContactPoint::new(x, y, t)
    }

    fn session() -> GestureSession {
        GestureSession::new(GestureConfig::default(), GestureHandlers::new())
    }

    fn tap_at(gs: &mut GestureSession, x: f64, y: f64, t: u64) -> Vec<Gesture> {
        let mut out = gs.on_contacts_start(&[pt(x, y, t)]);
        out.extend(gs.on_contacts_end(pt(x, y, t)));
        out
    }

    // --- Tap tests ---

    #[test]
    fn tap_is_deferred_until_window_closes() {
        let mut gs = session();
        assert!(tap_at(&mut gs, 5.0, 5.0, 0).is_empty());
        assert!(gs.has_pending_tap());

        assert!(gs.advance(299).is_empty());
        let events = gs.advance(300);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Gesture::Tap { point } if point.x == 5.0));
        assert!(!gs.has_pending_tap());
    }

    #[test]
    fn second_tap_in_window_is_double_tap() {
        let mut gs = session();
        tap_at(&mut gs, 5.0, 5.0, 0);
        let events = tap_at(&mut gs, 5.0, 5.0, 250);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Gesture::DoubleTap { .. }));
        assert!(!gs.has_pending_tap());
        assert!(gs.advance(10_000).is_empty());
    }

    #[test]
    fn tap_after_window_is_two_single_taps() {
        let mut gs = session();
        tap_at(&mut gs, 5.0, 5.0, 0);
        let events = tap_at(&mut gs, 5.0, 5.0, 350);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Gesture::Tap { point } if point.timestamp_ms == 0));

        let events = gs.advance(650);
        assert!(matches!(events[..], [Gesture::Tap { point }] if point.timestamp_ms == 350));
    }

    #[test]
    fn small_jitter_still_taps() {
        let mut gs = session();
        gs.on_contacts_start(&[pt(0.0, 0.0, 0)]);
        gs.on_contacts_move(&[pt(3.0, 4.0, 10)]);
        assert!(gs.on_contacts_end(pt(3.0, 4.0, 20)).is_empty());
        assert_eq!(gs.next_deadline(), Some(320));
        assert!(matches!(gs.advance(320)[..], [Gesture::Tap { .. }]));
    }

    // --- Long press tests ---

    #[test]
    fn long_press_fires_after_delay() {
        let mut gs = session();
        gs.on_contacts_start(&[pt(5.0, 5.0, 0)]);
        assert!(gs.advance(499).is_empty());
        let events = gs.advance(500);
        assert!(matches!(events[..], [Gesture::LongPress { point }] if point.x == 5.0));

        // Release after a long press emits nothing more.
        assert!(gs.on_contacts_end(pt(5.0, 5.0, 600)).is_empty());
        assert!(gs.advance(5_000).is_empty());
    }

    #[test]
    fn move_forfeits_long_press() {
        let mut gs = session();
        gs.on_contacts_start(&[pt(5.0, 5.0, 0)]);
        gs.on_contacts_move(&[pt(5.0, 5.0, 100)]);
        assert!(!gs.has_pending_long_press());
        assert!(gs.advance(2_000).is_empty());
    }

    #[test]
    fn long_press_delivered_on_release_without_ticks() {
        let mut gs = session();
        gs.on_contacts_start(&[pt(5.0, 5.0, 0)]);
        let events = gs.on_contacts_end(pt(5.0, 5.0, 600));
        assert!(matches!(events[..], [Gesture::LongPress { .. }]));
    }

    #[test]
    fn multi_contact_start_schedules_no_long_press() {
        let mut gs = session();
        gs.on_contacts_start(&[pt(0.0, 0.0, 0), pt(100.0, 0.0, 0)]);
        assert!(!gs.has_pending_long_press());
        assert!(gs.advance(1_000).is_empty());
    }

    // --- Swipe tests ---

    #[test]
    fn horizontal_swipes() {
        let mut gs = session();
        gs.on_contacts_start(&[pt(100.0, 100.0, 0)]);
        let events = gs.on_contacts_end(pt(200.0, 110.0, 150));
        assert!(matches!(
            events[..],
            [Gesture::Swipe {
                direction: SwipeDirection::Right,
                ..
            }]
        ));

        gs.on_contacts_start(&[pt(100.0, 100.0, 1_000)]);
        let events = gs.on_contacts_end(pt(20.0, 90.0, 1_150));
        assert!(matches!(
            events[..],
            [Gesture::Swipe {
                direction: SwipeDirection::Left,
                ..
            }]
        ));
    }

    #[test]
    fn vertical_swipes() {
        let mut gs = session();
        gs.on_contacts_start(&[pt(0.0, 100.0, 0)]);
        let events = gs.on_contacts_end(pt(0.0, 20.0, 100));
        assert!(matches!(
            events[..],
            [Gesture::Swipe {
                direction: SwipeDirection::Up,
                ..
            }]
        ));
    }

    #[test]
    fn diagonal_tie_is_vertical() {
        let mut gs = session();
        gs.on_contacts_start(&[pt(0.0, 0.0, 0)]);
        let events = gs.on_contacts_end(pt(50.0, 50.0, 100));
        assert!(matches!(
            events[..],
            [Gesture::Swipe {
                direction: SwipeDirection::Down,
                ..
            }]
        ));
    }

    #[test]
    fn release_between_thresholds_emits_nothing() {
        let mut gs = session();
        gs.on_contacts_start(&[pt(0.0, 0.0, 0)]);
        assert!(gs.on_contacts_end(pt(30.0, 0.0, 100)).is_empty());
        assert!(!gs.has_pending_tap());
        assert!(gs.advance(5_000).is_empty());
    }

    #[test]
    fn stale_press_emits_nothing() {
        let config = GestureConfig {
            max_gesture_duration: Duration::from_millis(400),
            ..GestureConfig::default()
        };
        let mut gs = GestureSession::new(config, GestureHandlers::new());
        gs.on_contacts_start(&[pt(0.0, 0.0, 0)]);
        gs.on_contacts_move(&[pt(100.0, 0.0, 10)]);
        assert!(gs.on_contacts_end(pt(100.0, 0.0, 400)).is_empty());
    }

    // --- Pinch tests ---

    #[test]
    fn pinch_reports_scale_on_every_move() {
        let mut gs = session();
        gs.on_contacts_start(&[pt(0.0, 0.0, 0), pt(100.0, 0.0, 0)]);

        let events = gs.on_contacts_move(&[pt(0.0, 0.0, 10), pt(150.0, 0.0, 10)]);
        assert!(matches!(events[..], [Gesture::PinchZoom { scale }] if scale == 1.5));

        let events = gs.on_contacts_move(&[pt(25.0, 0.0, 20), pt(75.0, 0.0, 20)]);
        assert!(matches!(events[..], [Gesture::PinchZoom { scale }] if scale == 0.5));

        // Lifting ends the pinch without a terminal gesture.
        assert!(gs.on_contacts_end(pt(75.0, 0.0, 30)).is_empty());
        assert!(!gs.is_tracking());
        assert!(gs.advance(5_000).is_empty());
    }

    #[test]
    fn second_finger_starts_new_pinch_lifecycle() {
        let mut gs = session();
        gs.on_contacts_start(&[pt(0.0, 0.0, 0)]);
        gs.on_contacts_start(&[pt(0.0, 0.0, 50), pt(0.0, 100.0, 50)]);
        assert_eq!(
            gs.active_contacts(),
            &[pt(0.0, 0.0, 50), pt(0.0, 100.0, 50)]
        );
        assert!(!gs.has_pending_long_press());
        let events = gs.on_contacts_move(&[pt(0.0, 0.0, 60), pt(0.0, 200.0, 60)]);
        assert!(matches!(events[..], [Gesture::PinchZoom { scale }] if scale == 2.0));
    }

    #[test]
    fn degenerate_pinch_baseline_is_skipped() {
        let mut gs = session();
        gs.on_contacts_start(&[pt(10.0, 10.0, 0), pt(10.0, 10.0, 0)]);
        assert!(
            gs.on_contacts_move(&[pt(0.0, 0.0, 10), pt(50.0, 0.0, 10)])
                .is_empty()
        );
    }

    // --- Cancel / malformed tests ---

    #[test]
    fn cancel_clears_all_timers() {
        let mut gs = session();
        tap_at(&mut gs, 0.0, 0.0, 0);
        gs.on_contacts_start(&[pt(0.0, 0.0, 100)]);
        gs.on_contacts_cancel();
        assert!(!gs.is_tracking());
        assert_eq!(gs.next_deadline(), None);
        assert!(gs.advance(10_000).is_empty());
    }

    #[test]
    fn empty_start_resets_to_idle() {
        let mut gs = session();
        gs.on_contacts_start(&[pt(0.0, 0.0, 0)]);
        assert!(gs.on_contacts_start(&[]).is_empty());
        assert!(!gs.is_tracking());
        assert!(!gs.has_pending_long_press());
    }

    #[test]
    fn empty_move_drops_lifecycle_but_keeps_pending_tap() {
        let mut gs = session();
        tap_at(&mut gs, 0.0, 0.0, 0);
        gs.on_contacts_start(&[pt(0.0, 0.0, 100)]);
        gs.on_contacts_move(&[]);
        assert!(!gs.is_tracking());
        assert!(gs.has_pending_tap());
    }

    #[test]
    fn end_without_start_is_ignored() {
        let mut gs = session();
        assert!(gs.on_contacts_end(pt(0.0, 0.0, 10)).is_empty());
        assert!(!gs.has_pending_tap());
    }

    #[test]
    fn handle_end_without_released_point() {
        let mut gs = session();
        gs.handle(&ContactEvent::start(vec![pt(0.0, 0.0, 0)]));
        let malformed = ContactEvent {
            phase: TouchPhase::End,
            contacts: Vec::new(),
            released: None,
        };
        assert!(gs.handle(&malformed).is_empty());
        assert!(!gs.is_tracking());
    }

    // --- Handlers / haptics ---

    #[test]
    fn handlers_and_haptics_receive_terminal_gestures() {
        let taps = Rc::new(RefCell::new(Vec::new()));
        let pulses = Rc::new(RefCell::new(Vec::new()));
        let (taps_in, pulses_in) = (Rc::clone(&taps), Rc::clone(&pulses));

        let handlers = GestureHandlers::new().on_double_tap(move |p| taps_in.borrow_mut().push(p));
        let mut gs = GestureSession::new(GestureConfig::default(), handlers)
            .with_haptics(move |pattern: &[u32]| pulses_in.borrow_mut().push(pattern.to_vec()));

        tap_at(&mut gs, 1.0, 1.0, 0);
        tap_at(&mut gs, 1.0, 1.0, 100);

        assert_eq!(taps.borrow().len(), 1);
        assert_eq!(*pulses.borrow(), vec![haptics::DOUBLE_TAP_PATTERN.to_vec()]);
    }

    #[test]
    fn rejected_haptics_do_not_block_gestures() {
        struct Rejecting;
        impl Haptics for Rejecting {
            fn vibrate(&mut self, _pattern_ms: &[u32]) -> Result<(), crate::error::HapticsError> {
                Err(crate::error::HapticsError::Rejected {
                    message: "busy".into(),
                })
            }
        }

        let mut gs = session().with_haptics(Rejecting);
        gs.on_contacts_start(&[pt(0.0, 0.0, 0)]);
        let events = gs.on_contacts_end(pt(90.0, 0.0, 100));
        assert!(matches!(
            events[..],
            [Gesture::Swipe {
                direction: SwipeDirection::Right,
                ..
            }]
        ));
    }

    #[test]
    fn pinch_requests_no_haptics() {
        let pulses = Rc::new(RefCell::new(0usize));
        let pulses_in = Rc::clone(&pulses);
        let mut gs = session().with_haptics(move |_: &[u32]| *pulses_in.borrow_mut() += 1);
        gs.on_contacts_start(&[pt(0.0, 0.0, 0), pt(10.0, 0.0, 0)]);
        gs.on_contacts_move(&[pt(0.0, 0.0, 5), pt(20.0, 0.0, 5)]);
        assert_eq!(*pulses.borrow(), 0);
    }

    #[test]
    fn try_new_rejects_invalid_config() {
        let config = GestureConfig {
            min_swipe_distance: -1.0,
            ..GestureConfig::default()
        };
        assert!(GestureSession::try_new(config, GestureHandlers::new()).is_err());
    }
}
