//! Values published to the presentation layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Phase, Theme, TimerState};

/// Everything a client needs to render the current screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub phase_label: String,
    pub remaining_millis: u64,
    /// `MM:SS`
    pub remaining_display: String,
    pub running: bool,
    pub theme: Theme,
    pub clock_visible: bool,
}

impl Snapshot {
    pub fn new(timer: &TimerState, theme: Theme, clock_visible: bool) -> Self {
        Self {
            phase: timer.phase,
            phase_label: timer.phase.label().to_string(),
            remaining_millis: timer.remaining_millis,
            remaining_display: timer.remaining_display(),
            running: timer.running,
            theme,
            clock_visible,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    PhaseStarted,
    ThemeRejected,
    ClockTapped,
}

/// Transient, toast-style message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn phase_started(phase: Phase) -> Self {
        Self::new(NotificationKind::PhaseStarted, phase.started_message())
    }
}
