//! Tomato Clock - a clock with a pomodoro work/break timer
//!
//! The core is a pure state machine ([`state::TimerState`]) that cycles
//! between work and break phases. [`state::AppState`] drives it from a
//! cancellable tick schedule ([`tasks::IntervalScheduler`]), manages the
//! light/dark theme, and publishes snapshots and notifications that the HTTP
//! API ([`api`]) serves to clients.

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{PomodoroError, PomodoroResult};
pub use state::{AppState, Phase, Snapshot, Theme, TimerSettings, TimerState};
pub use tasks::{IntervalScheduler, ManualScheduler, TokioTicker};
pub use utils::signals::shutdown_signal;
