#![forbid(unsafe_code)]

//! Drag-to-refresh controller for a scroll container.
//!
//! [`PullRefreshController`] is a one-dimensional drag-threshold state
//! machine guarding a single asynchronous refresh:
//!
//! ```text
//! Idle ──drag start at scroll top──▶ Pulling ──release < threshold──▶ Idle
//!                                       │
//!                                       └──release >= threshold──▶ Refreshing ──settled──▶ Idle
//! ```
//!
//! # Usage
//!
//! ```
//! use futures::FutureExt as _;
//! use tactile_core::config::PullRefreshConfig;
//! use tactile_core::pull_refresh::{PullPhase, PullRefreshController, PullRelease, RefreshFuture};
//!
//! let mut ctl = PullRefreshController::new(PullRefreshConfig::default(), || -> RefreshFuture {
//!     async { Ok(()) }.boxed_local()
//! });
//!
//! assert!(ctl.on_drag_start(10.0, 0.0));
//! ctl.on_drag_move(120.0, 0.0);
//! assert_eq!(ctl.on_drag_end(), PullRelease::Refreshing);
//! assert_eq!(ctl.phase(), PullPhase::Refreshing);
//!
//! futures::executor::block_on(ctl.settle());
//! assert_eq!(ctl.phase(), PullPhase::Idle);
//! ```
//!
//! # Invariants
//!
//! 1. The injected refresh runs at most once per pull, and never while a
//!    previous refresh is still in flight.
//! 2. `Refreshing` lasts until the refresh future settles, whatever its
//!    result. The controller keeps accepting (and ignoring) drag starts
//!    meanwhile.
//! 3. Disabling the controller blocks new pulls but never aborts an in-flight
//!    refresh.
//!
//! # Failure Modes
//!
//! - A failed refresh is logged at `warn` and returns the controller to
//!   `Idle` exactly like a success, minus the confirmation haptic.
//! - Dropping the controller (or [`teardown`](PullRefreshController::teardown))
//!   drops an in-flight refresh future with it.

use std::task::{Context, Poll};

use futures::FutureExt as _;
use futures::future::LocalBoxFuture;

use crate::config::PullRefreshConfig;
use crate::error::{ConfigError, RefreshError};
use crate::event::{ContactEvent, TouchPhase};
use crate::geometry;
use crate::haptics::{self, Haptics, NoHaptics};

/// Future returned by a [`RefreshHandler`].
pub type RefreshFuture = LocalBoxFuture<'static, Result<(), RefreshError>>;

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// The asynchronous refresh operation injected by the caller.
pub trait RefreshHandler {
    fn refresh(&mut self) -> RefreshFuture;
}

impl<F> RefreshHandler for F
where
    F: FnMut() -> RefreshFuture,
{
    fn refresh(&mut self) -> RefreshFuture {
        self()
    }
}

/// What the pull indicator should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorState {
    /// Pull progress in `[0, 1]`.
    pub opacity: f64,
    /// Releasing now would trigger a refresh.
    pub ready: bool,
    /// A refresh is in flight.
    pub refreshing: bool,
}

impl IndicatorState {
    /// Nothing shown.
    pub const HIDDEN: Self = Self {
        opacity: 0.0,
        ready: false,
        refreshing: false,
    };

    /// Fully shown, spinning.
    pub const REFRESHING: Self = Self {
        opacity: 1.0,
        ready: true,
        refreshing: true,
    };
}

/// Visual sink for indicator updates.
pub trait RefreshIndicator {
    fn update(&mut self, state: IndicatorState);
}

impl<F> RefreshIndicator for F
where
    F: FnMut(IndicatorState),
{
    fn update(&mut self, state: IndicatorState) {
        self(state);
    }
}

/// Indicator for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIndicator;

impl RefreshIndicator for NoIndicator {
    fn update(&mut self, _state: IndicatorState) {}
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Phase of the drag-to-refresh state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PullPhase {
    #[default]
    Idle,
    Pulling,
    Refreshing,
}

/// Snapshot of the controller's state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PullRefreshState {
    pub phase: PullPhase,
    pub start_y: f64,
    pub current_y: f64,
    /// Whether the scroll container was at the top on the latest event.
    pub at_top: bool,
    pub enabled: bool,
}

impl Default for PullRefreshState {
    fn default() -> Self {
        Self {
            phase: PullPhase::Idle,
            start_y: 0.0,
            current_y: 0.0,
            at_top: true,
            enabled: true,
        }
    }
}

/// Result of releasing a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullRelease {
    /// No pull was open.
    Ignored,
    /// The pull did not reach the threshold at the top of the content.
    Cancelled,
    /// The refresh was started.
    Refreshing,
}

/// How an in-flight refresh settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Completed,
    Failed(RefreshError),
}

// ---------------------------------------------------------------------------
// PullRefreshController
// ---------------------------------------------------------------------------

/// Drag-to-refresh controller bound to one scroll container.
pub struct PullRefreshController {
    config: PullRefreshConfig,
    state: PullRefreshState,
    refresher: Box<dyn RefreshHandler>,
    indicator: Box<dyn RefreshIndicator>,
    haptics: Box<dyn Haptics>,
    in_flight: Option<RefreshFuture>,
    refresh_count: u64,
}

impl std::fmt::Debug for PullRefreshController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PullRefreshController")
            .field("state", &self.state)
            .field("in_flight", &self.in_flight.is_some())
            .field("refresh_count", &self.refresh_count)
            .finish()
    }
}

impl PullRefreshController {
    /// Create a controller that calls `refresher` on a completed pull.
    #[must_use]
    pub fn new(config: PullRefreshConfig, refresher: impl RefreshHandler + 'static) -> Self {
        Self {
            config,
            state: PullRefreshState::default(),
            refresher: Box::new(refresher),
            indicator: Box::new(NoIndicator),
            haptics: Box::new(NoHaptics),
            in_flight: None,
            refresh_count: 0,
        }
    }

    /// Validate `config` and create a controller.
    pub fn try_new(
        config: PullRefreshConfig,
        refresher: impl RefreshHandler + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config, refresher))
    }

    #[must_use]
    pub fn with_indicator(mut self, indicator: impl RefreshIndicator + 'static) -> Self {
        self.indicator = Box::new(indicator);
        self
    }

    #[must_use]
    pub fn with_haptics(mut self, haptics: impl Haptics + 'static) -> Self {
        self.haptics = Box::new(haptics);
        self
    }

    /// Route a contact event; contact 0 drives the pull.
    pub fn handle(&mut self, event: &ContactEvent, scroll_top: f64) -> PullRelease {
        match event.phase {
            TouchPhase::Start => {
                if let Some(first) = event.contacts.first() {
                    self.on_drag_start(first.y, scroll_top);
                }
                PullRelease::Ignored
            }
            TouchPhase::Move => {
                if let Some(first) = event.contacts.first() {
                    self.on_drag_move(first.y, scroll_top);
                }
                PullRelease::Ignored
            }
            TouchPhase::End => self.on_drag_end(),
            TouchPhase::Cancel => {
                self.on_drag_cancel();
                PullRelease::Ignored
            }
        }
    }

    /// A vertical drag began at `y`. Returns whether a pull started.
    pub fn on_drag_start(&mut self, y: f64, scroll_top: f64) -> bool {
        if !self.state.enabled {
            tracing::trace!("pull refresh disabled; drag start ignored");
            return false;
        }
        if self.state.phase == PullPhase::Refreshing {
            tracing::trace!("refresh in flight; drag start ignored");
            return false;
        }
        if !at_top(scroll_top) {
            return false;
        }
        self.state.phase = PullPhase::Pulling;
        self.state.start_y = y;
        self.state.current_y = y;
        self.state.at_top = true;
        tracing::debug!(start_y = y, "pull started");
        true
    }

    /// The drag moved to `y`.
    pub fn on_drag_move(&mut self, y: f64, scroll_top: f64) {
        if self.state.phase != PullPhase::Pulling {
            return;
        }
        self.state.current_y = y;
        self.state.at_top = at_top(scroll_top);

        let pulled = self.pull_distance();
        let update = if pulled > 0.0 && self.state.at_top {
            let threshold = self.config.pull_threshold;
            IndicatorState {
                opacity: geometry::pull_progress(pulled, threshold),
                ready: geometry::reaches(pulled, threshold),
                refreshing: false,
            }
        } else {
            // Releasing here would cancel; never leave a stale "ready" shown.
            IndicatorState::HIDDEN
        };
        self.indicator.update(update);
    }

    /// The drag was released.
    pub fn on_drag_end(&mut self) -> PullRelease {
        if self.state.phase != PullPhase::Pulling {
            return PullRelease::Ignored;
        }
        let pulled = self.pull_distance();
        let armed = pulled > 0.0 && geometry::reaches(pulled, self.config.pull_threshold);
        if armed && self.state.at_top {
            self.start_refresh();
            PullRelease::Refreshing
        } else {
            tracing::debug!(pulled, "pull released below threshold");
            self.return_to_idle();
            PullRelease::Cancelled
        }
    }

    /// The platform interrupted the drag. Drops an open pull; an in-flight
    /// refresh is unaffected.
    pub fn on_drag_cancel(&mut self) {
        if self.state.phase == PullPhase::Pulling {
            self.return_to_idle();
        }
    }

    /// Drive the in-flight refresh. Resolves to `None` when nothing is in
    /// flight.
    pub fn poll_refresh(&mut self, cx: &mut Context<'_>) -> Poll<Option<RefreshOutcome>> {
        let Some(refresh) = self.in_flight.as_mut() else {
            return Poll::Ready(None);
        };
        let result = futures::ready!(refresh.poll_unpin(cx));
        self.in_flight = None;
        Poll::Ready(Some(self.finish_refresh(result)))
    }

    /// Wait for the in-flight refresh to settle.
    pub async fn settle(&mut self) -> Option<RefreshOutcome> {
        futures::future::poll_fn(|cx| self.poll_refresh(cx)).await
    }

    /// Allow or block new pulls. An in-flight refresh keeps running.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.state.enabled = enabled;
    }

    /// Release the controller, hiding the indicator. An in-flight refresh
    /// future is dropped.
    pub fn teardown(mut self) {
        if self.in_flight.take().is_some() {
            tracing::debug!("teardown dropped an in-flight refresh");
        }
        self.indicator.update(IndicatorState::HIDDEN);
    }

    #[inline]
    #[must_use]
    pub fn phase(&self) -> PullPhase {
        self.state.phase
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PullRefreshState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    /// Downward travel of the open pull (negative when above the start).
    #[inline]
    #[must_use]
    pub fn pull_distance(&self) -> f64 {
        self.state.current_y - self.state.start_y
    }

    /// How many refreshes this controller has started.
    #[inline]
    #[must_use]
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &PullRefreshConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Internal
// ---------------------------------------------------------------------------

impl PullRefreshController {
    fn start_refresh(&mut self) {
        self.state.phase = PullPhase::Refreshing;
        self.refresh_count += 1;
        self.indicator.update(IndicatorState::REFRESHING);
        tracing::debug!(count = self.refresh_count, "refresh started");
        self.in_flight = Some(self.refresher.refresh());
    }

    fn finish_refresh(&mut self, result: Result<(), RefreshError>) -> RefreshOutcome {
        self.return_to_idle();
        match result {
            Ok(()) => {
                if let Err(error) = self.haptics.vibrate(haptics::REFRESH_DONE_PATTERN) {
                    tracing::debug!(%error, "haptic request not delivered");
                }
                tracing::debug!("refresh completed");
                RefreshOutcome::Completed
            }
            Err(error) => {
                tracing::warn!(%error, "refresh failed");
                RefreshOutcome::Failed(error)
            }
        }
    }

    fn return_to_idle(&mut self) {
        self.state.phase = PullPhase::Idle;
        self.state.start_y = 0.0;
        self.state.current_y = 0.0;
        self.indicator.update(IndicatorState::HIDDEN);
    }
}

fn at_top(scroll_top: f64) -> bool {
    scroll_top <= 0.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
