#![forbid(unsafe_code)]

//! Owned, single-purpose timer slots.
//!
//! A [`TimerSlot`] holds at most one pending deadline. Time is supplied by
//! the caller as milliseconds on the same clock as
//! [`ContactPoint::timestamp_ms`](crate::geometry::ContactPoint), and a
//! timer only fires when the owner asks [`TimerSlot::fire_if_due`], so the
//! whole machine stays deterministic under test.
//!
//! # Invariants
//! 1. Scheduling a slot that is already pending cancels the old timer first.
//! 2. A cancelled timer never fires.
//! 3. A fired timer leaves the slot empty.

use web_time::Duration;

/// Identity of one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    id: u64,
    deadline_ms: u64,
}

impl TimerHandle {
    /// Monotonic id, unique within the owning slot.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Clock time at which the timer is due.
    #[inline]
    #[must_use]
    pub const fn deadline_ms(&self) -> u64 {
        self.deadline_ms
    }
}

/// A slot owning zero or one pending timer.
#[derive(Debug, Clone, Default)]
pub struct TimerSlot {
    pending: Option<TimerHandle>,
    next_id: u64,
}

impl TimerSlot {
    /// Create an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pending: None,
            next_id: 0,
        }
    }

    /// Schedule a timer `delay` after `now_ms`, cancelling any pending one.
    pub fn schedule(&mut self, now_ms: u64, delay: Duration) -> TimerHandle {
        if let Some(old) = self.cancel() {
            tracing::trace!(id = old.id, "superseded pending timer");
        }
        self.next_id = self.next_id.wrapping_add(1);
        let handle = TimerHandle {
            id: self.next_id,
            deadline_ms: now_ms.saturating_add(millis(delay)),
        };
        self.pending = Some(handle);
        handle
    }

    /// Cancel the pending timer, returning it if there was one.
    pub fn cancel(&mut self) -> Option<TimerHandle> {
        self.pending.take()
    }

    /// Whether a timer is pending.
    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline of the pending timer.
    #[inline]
    #[must_use]
    pub fn deadline_ms(&self) -> Option<u64> {
        self.pending.map(|h| h.deadline_ms)
    }

    /// Take the pending timer if its deadline is at or before `now_ms`.
    pub fn fire_if_due(&mut self, now_ms: u64) -> Option<TimerHandle> {
        match self.pending {
            Some(handle) if handle.deadline_ms <= now_ms => self.pending.take(),
            _ => None,
        }
    }
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
#[inline]
#[must_use]
pub fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
