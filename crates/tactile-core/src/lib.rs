#![forbid(unsafe_code)]

//! Core: touch gesture disambiguation and pull-to-refresh.
//!
//! # Role in Tactile
//! `tactile-core` turns raw contact-lifecycle events (press, move, release,
//! cancel) into semantic actions. It owns no platform bindings: a host
//! adapter translates its touch events into [`event::ContactEvent`]s and
//! wires the outbound collaborators (gesture callbacks, haptics, refresh
//! indicator).
//!
//! # Primary responsibilities
//! - **GestureSession**: classifies one element's contact lifecycles into
//!   tap, double-tap, long-press, swipe, and continuous pinch-zoom.
//! - **PullRefreshController**: drag-threshold state machine guarding one
//!   asynchronous refresh at a time.
//! - **Geometry / timers**: shared pure helpers and owned timer slots driven
//!   by the host's millisecond clock.
//!
//! # How it fits in the system
//! Both components are single-threaded and event-driven: every handler runs
//! to completion, and the only suspension point is the refresh future, which
//! the controller owns until it settles.

pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod haptics;
pub mod pull_refresh;
pub mod timer;

#[cfg(feature = "event-trace")]
pub mod trace;

pub use config::{GestureConfig, PullRefreshConfig, TactileConfig};
pub use error::{ConfigError, HapticsError, RefreshError};
pub use event::{ContactEvent, Gesture, SwipeDirection, TouchPhase};
pub use geometry::ContactPoint;
pub use gesture::{GestureHandlers, GestureSession};
pub use pull_refresh::{PullPhase, PullRefreshController, PullRelease, RefreshOutcome};
