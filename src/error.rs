//! Error types for timer and theme operations

/// Message shown when the theme toggle is refused
pub const THEME_LOCKED_MESSAGE: &str = "cannot switch theme while timer running";

/// Result type for pomodoro operations
pub type PomodoroResult<T> = Result<T, PomodoroError>;

/// Errors that can occur while driving the pomodoro timer
#[derive(Debug, thiserror::Error)]
pub enum PomodoroError {
    /// The theme is locked to the phase while the countdown is running
    #[error("{}", THEME_LOCKED_MESSAGE)]
    ThemeLocked,

    #[error("Failed to lock {0}: state poisoned")]
    StateLock(&'static str),
}

impl<T> From<std::sync::PoisonError<T>> for PomodoroError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        PomodoroError::StateLock("timer state")
    }
}
