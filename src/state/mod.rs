//! State management module
//!
//! This module contains the pomodoro state machine, the values it publishes
//! and the shared application state that drives it.

pub mod app_state;
pub mod phase;
pub mod snapshot;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, TimerSettings};
pub use phase::{format_remaining, Phase, PhaseDurations, Theme};
pub use snapshot::{Notification, NotificationKind, Snapshot};
pub use timer_state::{Effect, TimerEvent, TimerState, Transition};
