//! Pomodoro phases, their durations and the theme each one selects

use serde::{Deserialize, Serialize};

/// Default work phase length: 25 minutes
pub const WORK_DURATION_MS: u64 = 25 * 60 * 1000;
/// Default break phase length: 5 minutes
pub const BREAK_DURATION_MS: u64 = 5 * 60 * 1000;

/// Which half of the pomodoro cycle is counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    /// The phase that follows this one when the countdown expires
    pub fn next(self) -> Self {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::Break => "Break",
        }
    }

    /// One-shot message announcing that this phase has begun
    pub fn started_message(self) -> &'static str {
        match self {
            Phase::Work => "Work started!",
            Phase::Break => "Break started!",
        }
    }

    /// Work runs in the dark theme, breaks in the light one
    pub fn theme(self) -> Theme {
        match self {
            Phase::Work => Theme::Dark,
            Phase::Break => Theme::Light,
        }
    }
}

/// Color scheme of the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Full countdown length of each phase, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDurations {
    pub work_millis: u64,
    pub break_millis: u64,
}

impl PhaseDurations {
    /// `None` when either length does not fit in milliseconds
    pub fn from_minutes(work_minutes: u64, break_minutes: u64) -> Option<Self> {
        Some(Self {
            work_millis: minutes_to_millis(work_minutes)?,
            break_millis: minutes_to_millis(break_minutes)?,
        })
    }

    pub fn of(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_millis,
            Phase::Break => self.break_millis,
        }
    }
}

impl Default for PhaseDurations {
    fn default() -> Self {
        Self {
            work_millis: WORK_DURATION_MS,
            break_millis: BREAK_DURATION_MS,
        }
    }
}

fn minutes_to_millis(minutes: u64) -> Option<u64> {
    minutes.checked_mul(60 * 1000)
}

/// Render a remaining duration as `MM:SS`
pub fn format_remaining(millis: u64) -> String {
    let minutes = millis / 1000 / 60;
    let seconds = millis / 1000 % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(65_000, "01:05")]
    #[case(0, "00:00")]
    #[case(999, "00:00")]
    #[case(59_999, "00:59")]
    #[case(WORK_DURATION_MS, "25:00")]
    #[case(BREAK_DURATION_MS, "05:00")]
    #[case(100 * 60 * 1000, "100:00")]
    fn formats_remaining_time(#[case] millis: u64, #[case] expected: &str) {
        assert_eq!(format_remaining(millis), expected);
    }

    #[test]
    fn phases_alternate() {
        assert_eq!(Phase::Work.next(), Phase::Break);
        assert_eq!(Phase::Break.next(), Phase::Work);
    }

    #[test]
    fn phase_selects_theme() {
        assert_eq!(Phase::Work.theme(), Theme::Dark);
        assert_eq!(Phase::Break.theme(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[test]
    fn oversized_minutes_do_not_convert() {
        assert_eq!(PhaseDurations::from_minutes(400_000_000_000_000, 5), None);
        assert_eq!(PhaseDurations::from_minutes(25, u64::MAX), None);
        assert_eq!(
            PhaseDurations::from_minutes(25, 5),
            Some(PhaseDurations::default())
        );
    }

    #[test]
    fn durations_follow_phase() {
        let durations = PhaseDurations::default();
        assert_eq!(durations.of(Phase::Work), 1_500_000);
        assert_eq!(durations.of(Phase::Break), 300_000);
    }
}
