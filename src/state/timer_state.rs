//! Pomodoro timer state machine
//!
//! The machine is a pure function from `(TimerState, TimerEvent)` to a
//! [`Transition`]: the next snapshot plus the side effects the owner must
//! carry out (scheduling ticks, announcing a phase, switching the display).
//! Nothing here touches a clock or a channel.

use serde::{Deserialize, Serialize};

use super::phase::{format_remaining, Phase, PhaseDurations};

/// Snapshot of the countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    /// Never exceeds the duration of `phase`
    pub remaining_millis: u64,
    pub running: bool,
}

/// Inputs to the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    Start,
    Pause,
    Reset,
    /// A scheduled tick reporting the elapsed milliseconds
    Tick(u64),
}

/// Side effects requested by a transition, in the order they must run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Cancel the active tick schedule, if any
    CancelTicks,
    /// Begin a fresh recurring tick schedule
    ScheduleTicks,
    /// Hide the clock and switch to the countdown's phase theme
    EnterCountdown,
    /// Show the clock again and return to the light theme
    ExitCountdown,
    /// Announce that a new phase has begun
    PhaseStarted(Phase),
}

/// Result of applying one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: TimerState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: TimerState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    /// Whether this transition crossed into a new phase
    pub fn started_phase(&self) -> Option<Phase> {
        self.effects.iter().find_map(|effect| match effect {
            Effect::PhaseStarted(phase) => Some(*phase),
            _ => None,
        })
    }
}

impl TimerState {
    /// Idle at the start of a work phase
    pub fn new(durations: &PhaseDurations) -> Self {
        Self {
            phase: Phase::Work,
            remaining_millis: durations.work_millis,
            running: false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Remaining time as `MM:SS`
    pub fn remaining_display(&self) -> String {
        format_remaining(self.remaining_millis)
    }

    /// Apply an event and return the next state with its effects
    pub fn apply(self, event: TimerEvent, durations: &PhaseDurations) -> Transition {
        match event {
            TimerEvent::Start => self.start(),
            TimerEvent::Pause => self.pause(),
            TimerEvent::Reset => Self::reset(durations),
            TimerEvent::Tick(elapsed) => self.tick(elapsed, durations),
        }
    }

    fn start(self) -> Transition {
        let mut effects = Vec::with_capacity(3);
        if self.running {
            effects.push(Effect::CancelTicks);
        }
        effects.push(Effect::ScheduleTicks);
        effects.push(Effect::EnterCountdown);

        Transition {
            state: Self {
                running: true,
                ..self
            },
            effects,
        }
    }

    fn pause(self) -> Transition {
        Transition {
            state: Self {
                running: false,
                ..self
            },
            effects: vec![Effect::CancelTicks],
        }
    }

    fn reset(durations: &PhaseDurations) -> Transition {
        Transition {
            state: Self::new(durations),
            effects: vec![Effect::CancelTicks, Effect::ExitCountdown],
        }
    }

    fn tick(self, elapsed: u64, durations: &PhaseDurations) -> Transition {
        if !self.running {
            return Transition::unchanged(self);
        }

        let remaining_millis = self.remaining_millis.saturating_sub(elapsed);
        if remaining_millis > 0 {
            return Transition {
                state: Self {
                    remaining_millis,
                    ..self
                },
                effects: Vec::new(),
            };
        }

        self.expire(durations)
    }

    /// TimerExpired: flip phase, refill the countdown, announce the new
    /// phase and re-enter the running state on a fresh schedule.
    fn expire(self, durations: &PhaseDurations) -> Transition {
        let phase = self.phase.next();
        Transition {
            state: Self {
                phase,
                remaining_millis: durations.of(phase),
                running: true,
            },
            effects: vec![
                Effect::PhaseStarted(phase),
                Effect::CancelTicks,
                Effect::ScheduleTicks,
                Effect::EnterCountdown,
            ],
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(&PhaseDurations::default())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::state::phase::{BREAK_DURATION_MS, WORK_DURATION_MS};

    fn running(phase: Phase, remaining_millis: u64) -> TimerState {
        TimerState {
            phase,
            remaining_millis,
            running: true,
        }
    }

    #[test]
    fn starts_idle_at_full_work_phase() {
        let state = TimerState::default();
        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.remaining_millis, WORK_DURATION_MS);
        assert!(!state.is_running());
        assert_eq!(state.remaining_display(), "25:00");
    }

    #[test]
    fn start_from_idle_schedules_without_cancelling() {
        let transition = TimerState::default().apply(TimerEvent::Start, &PhaseDurations::default());

        assert!(transition.state.running);
        assert_eq!(
            transition.effects,
            vec![Effect::ScheduleTicks, Effect::EnterCountdown]
        );
    }

    #[test]
    fn restart_while_running_cancels_first() {
        let state = running(Phase::Work, 42_000);
        let transition = state.apply(TimerEvent::Start, &PhaseDurations::default());

        assert_eq!(transition.state, state);
        assert_eq!(transition.effects[0], Effect::CancelTicks);
        assert_eq!(transition.effects[1], Effect::ScheduleTicks);
    }

    #[test]
    fn pause_keeps_remaining_time() {
        let transition =
            running(Phase::Break, 123_000).apply(TimerEvent::Pause, &PhaseDurations::default());

        assert_eq!(
            transition.state,
            TimerState {
                phase: Phase::Break,
                remaining_millis: 123_000,
                running: false,
            }
        );
        assert_eq!(transition.effects, vec![Effect::CancelTicks]);
    }

    #[test]
    fn pause_then_start_resumes_from_same_point() {
        let durations = PhaseDurations::default();
        let before = running(Phase::Work, 777_000);
        let resumed = before
            .apply(TimerEvent::Pause, &durations)
            .state
            .apply(TimerEvent::Start, &durations)
            .state;

        assert_eq!(resumed, before);
    }

    #[rstest]
    #[case(TimerState::default())]
    #[case(running(Phase::Work, 1))]
    #[case(running(Phase::Break, 299_000))]
    #[case(TimerState { phase: Phase::Break, remaining_millis: 10_000, running: false })]
    fn reset_always_returns_to_idle_work(#[case] state: TimerState) {
        let transition = state.apply(TimerEvent::Reset, &PhaseDurations::default());

        assert_eq!(
            transition.state,
            TimerState {
                phase: Phase::Work,
                remaining_millis: 1_500_000,
                running: false,
            }
        );
        assert_eq!(
            transition.effects,
            vec![Effect::CancelTicks, Effect::ExitCountdown]
        );
    }

    #[test]
    fn tick_while_idle_is_ignored() {
        let state = TimerState::default();
        let transition = state.apply(TimerEvent::Tick(1000), &PhaseDurations::default());

        assert_eq!(transition.state, state);
        assert!(transition.effects.is_empty());
    }

    #[rstest]
    #[case(Phase::Work, Phase::Break, BREAK_DURATION_MS)]
    #[case(Phase::Break, Phase::Work, WORK_DURATION_MS)]
    fn expiry_flips_phase_and_keeps_running(
        #[case] from: Phase,
        #[case] to: Phase,
        #[case] refill: u64,
    ) {
        let transition = running(from, 1000).apply(TimerEvent::Tick(1000), &PhaseDurations::default());

        assert_eq!(transition.state, running(to, refill));
        assert_eq!(transition.started_phase(), Some(to));
        assert_eq!(
            transition.effects,
            vec![
                Effect::PhaseStarted(to),
                Effect::CancelTicks,
                Effect::ScheduleTicks,
                Effect::EnterCountdown,
            ]
        );
    }

    #[test]
    fn overshooting_tick_saturates_at_expiry() {
        let transition =
            running(Phase::Work, 400).apply(TimerEvent::Tick(1000), &PhaseDurations::default());
        assert_eq!(transition.state, running(Phase::Break, BREAK_DURATION_MS));
    }

    fn assert_countdown_then_flip(start: Phase, ticks: Vec<u64>) -> Result<(), TestCaseError> {
        let durations = PhaseDurations::default();
        let mut state = running(start, durations.of(start));

        for elapsed in ticks {
            let next = state.apply(TimerEvent::Tick(elapsed), &durations);
            if next.state.phase == state.phase {
                prop_assert!(next.state.remaining_millis < state.remaining_millis);
                prop_assert!(next.state.remaining_millis > 0);
                prop_assert_eq!(next.started_phase(), None);
            } else {
                prop_assert_eq!(next.state.phase, start.next());
                prop_assert_eq!(next.state.remaining_millis, durations.of(start.next()));
                prop_assert!(next.state.running);
                prop_assert!(elapsed >= state.remaining_millis);
                return Ok(());
            }
            prop_assert!(next.state.remaining_millis <= durations.of(next.state.phase));
            state = next.state;
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn work_counts_down_then_becomes_break(ticks in prop::collection::vec(1u64..=120_000, 0..200)) {
            assert_countdown_then_flip(Phase::Work, ticks)?;
        }

        #[test]
        fn break_counts_down_then_becomes_work(ticks in prop::collection::vec(1u64..=30_000, 0..200)) {
            assert_countdown_then_flip(Phase::Break, ticks)?;
        }
    }
}
