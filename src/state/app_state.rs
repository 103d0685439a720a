//! Main application state management

use std::{
    sync::{Arc, Mutex, Weak},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};

use super::{
    Effect, Notification, NotificationKind, PhaseDurations, Snapshot, Theme, TimerEvent,
    TimerState, Transition,
};
use crate::{
    clock,
    error::{PomodoroError, PomodoroResult, THEME_LOCKED_MESSAGE},
    tasks::{IntervalScheduler, TickCallback, TickHandle},
};

/// How the countdown is paced and presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSettings {
    pub durations: PhaseDurations,
    pub tick_interval: Duration,
    /// Switch to the phase theme on start and back to light on reset
    pub follow_phase_theme: bool,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            durations: PhaseDurations::default(),
            tick_interval: Duration::from_secs(1),
            follow_phase_theme: true,
        }
    }
}

/// Everything guarded by the single state lock
#[derive(Debug)]
struct Inner {
    timer: TimerState,
    theme: Theme,
    clock_visible: bool,
    /// The only schedule allowed to advance `timer`
    active_tick: Option<TickHandle>,
    last_action: Option<String>,
    last_action_time: Option<DateTime<Utc>>,
}

/// Main application state: owns the timer, the theme and the tick schedule
pub struct AppState {
    settings: TimerSettings,
    scheduler: Arc<dyn IntervalScheduler>,
    inner: Mutex<Inner>,
    /// Handed to tick callbacks so a dropped state stops receiving ticks
    self_ref: Weak<AppState>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Latest snapshot, replaced after every state change
    snapshot_tx: watch::Sender<Snapshot>,
    /// One-shot notifications
    notification_tx: broadcast::Sender<Notification>,
}

impl AppState {
    /// Create the state idle at the start of a work phase
    pub fn new(
        host: String,
        port: u16,
        settings: TimerSettings,
        scheduler: Arc<dyn IntervalScheduler>,
    ) -> Arc<Self> {
        let timer = TimerState::new(&settings.durations);
        let theme = Theme::default();
        let (snapshot_tx, _) = watch::channel(Snapshot::new(&timer, theme, true));
        let (notification_tx, _) = broadcast::channel(100);

        Arc::new_cyclic(|self_ref| Self {
            settings,
            scheduler,
            inner: Mutex::new(Inner {
                timer,
                theme,
                clock_visible: true,
                active_tick: None,
                last_action: None,
                last_action_time: None,
            }),
            self_ref: self_ref.clone(),
            start_time: Instant::now(),
            port,
            host,
            snapshot_tx,
            notification_tx,
        })
    }

    /// Start or resume the countdown
    pub fn start(&self) -> PomodoroResult<Snapshot> {
        info!("Starting countdown");
        self.dispatch("start", TimerEvent::Start)
    }

    /// Stop ticking and keep the remaining time
    pub fn pause(&self) -> PomodoroResult<Snapshot> {
        info!("Pausing countdown");
        self.dispatch("pause", TimerEvent::Pause)
    }

    /// Stop ticking and return to an idle work phase
    pub fn reset(&self) -> PomodoroResult<Snapshot> {
        info!("Resetting countdown");
        self.dispatch("reset", TimerEvent::Reset)
    }

    /// Advance the countdown from a scheduled tick. Ticks from any schedule
    /// other than the active one are dropped.
    pub fn on_tick(&self, handle: TickHandle, elapsed: Duration) -> PomodoroResult<()> {
        let mut inner = self.inner.lock()?;

        if inner.active_tick != Some(handle) {
            debug!("Dropping stale tick from {}", handle);
            return Ok(());
        }

        let elapsed_millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let transition = inner
            .timer
            .apply(TimerEvent::Tick(elapsed_millis), &self.settings.durations);
        self.commit(&mut inner, transition);
        Ok(())
    }

    /// Flip between light and dark. Refused while the countdown runs.
    pub fn toggle_theme(&self) -> PomodoroResult<Snapshot> {
        let mut inner = self.inner.lock()?;

        if inner.timer.is_running() {
            warn!("Theme toggle rejected: countdown is running");
            self.notify(Notification::new(
                NotificationKind::ThemeRejected,
                THEME_LOCKED_MESSAGE,
            ));
            return Err(PomodoroError::ThemeLocked);
        }

        inner.theme = inner.theme.toggled();
        info!("Theme switched to {:?}", inner.theme);
        Self::record_action(&mut inner, "theme-toggle");
        Ok(self.publish(&inner))
    }

    /// Announce the current wall-clock time
    pub fn tap_clock(&self) -> PomodoroResult<Notification> {
        let notification = Notification::new(
            NotificationKind::ClockTapped,
            clock::tap_message(&clock::now_display()),
        );

        let mut inner = self.inner.lock()?;
        Self::record_action(&mut inner, "clock-tap");
        drop(inner);

        debug!("{}", notification.message);
        self.notify(notification.clone());
        Ok(notification)
    }

    /// Cancel the active tick schedule ahead of process exit
    pub fn shutdown(&self) {
        match self.inner.lock() {
            Ok(mut inner) => {
                if let Some(handle) = inner.active_tick.take() {
                    self.scheduler.cancel(handle);
                    info!("Cancelled countdown schedule for shutdown");
                }
            }
            Err(e) => warn!("Failed to lock timer state during shutdown: {}", e),
        }
    }

    /// Current presentation snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_tx.borrow().clone()
    }

    pub fn timer_state(&self) -> PomodoroResult<TimerState> {
        Ok(self.inner.lock()?.timer)
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    pub fn subscribe_notifications(&self) -> broadcast::Receiver<Notification> {
        self.notification_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        self.inner
            .lock()
            .map(|inner| (inner.last_action.clone(), inner.last_action_time))
            .unwrap_or((None, None))
    }

    fn dispatch(&self, action: &str, event: TimerEvent) -> PomodoroResult<Snapshot> {
        let mut inner = self.inner.lock()?;
        let transition = inner.timer.apply(event, &self.settings.durations);
        Self::record_action(&mut inner, action);
        Ok(self.commit(&mut inner, transition))
    }

    /// Install the transition's state, run its effects in order and publish
    /// the resulting snapshot. Called with the state lock held.
    fn commit(&self, inner: &mut Inner, transition: Transition) -> Snapshot {
        inner.timer = transition.state;

        for effect in transition.effects {
            match effect {
                Effect::CancelTicks => self.cancel_ticks(inner),
                Effect::ScheduleTicks => {
                    self.cancel_ticks(inner);
                    let handle = self
                        .scheduler
                        .schedule(self.settings.tick_interval, self.tick_callback());
                    debug!("Countdown now driven by {}", handle);
                    inner.active_tick = Some(handle);
                }
                Effect::EnterCountdown => {
                    inner.clock_visible = false;
                    if self.settings.follow_phase_theme {
                        inner.theme = inner.timer.phase.theme();
                    }
                }
                Effect::ExitCountdown => {
                    inner.clock_visible = true;
                    if self.settings.follow_phase_theme {
                        inner.theme = Theme::Light;
                    }
                }
                Effect::PhaseStarted(phase) => {
                    info!("{} phase started", phase.label());
                    self.notify(Notification::phase_started(phase));
                }
            }
        }

        self.publish(inner)
    }

    fn cancel_ticks(&self, inner: &mut Inner) {
        if let Some(handle) = inner.active_tick.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn tick_callback(&self) -> TickCallback {
        let state = self.self_ref.clone();
        Arc::new(move |handle: TickHandle, elapsed: Duration| {
            let Some(state) = state.upgrade() else {
                return;
            };
            if let Err(e) = state.on_tick(handle, elapsed) {
                warn!("Failed to apply {}: {}", handle, e);
            }
        })
    }

    fn publish(&self, inner: &Inner) -> Snapshot {
        let snapshot = Snapshot::new(&inner.timer, inner.theme, inner.clock_visible);
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }

    fn notify(&self, notification: Notification) {
        // No receivers is normal when nobody is subscribed to events.
        if self.notification_tx.send(notification).is_err() {
            debug!("No notification subscribers");
        }
    }

    fn record_action(inner: &mut Inner, action: &str) {
        inner.last_action = Some(action.to_string());
        inner.last_action_time = Some(Utc::now());
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("settings", &self.settings)
            .field("inner", &self.inner)
            .field("host", &self.host)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}
