//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::state::{PhaseDurations, TimerSettings};

/// CLI argument parsing structure
#[derive(Debug, Clone, Parser)]
#[command(name = "tomato-clock")]
#[command(about = "A clock with a pomodoro work/break timer, served over HTTP")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Length of a work phase in minutes
    #[arg(short, long, default_value = "25")]
    pub work_minutes: u64,

    /// Length of a break phase in minutes
    #[arg(short, long, default_value = "5")]
    pub break_minutes: u64,

    /// Countdown tick interval in milliseconds
    #[arg(long, default_value = "1000", hide = true)]
    pub tick_ms: u64,

    /// Keep the manually chosen theme instead of switching it per phase
    #[arg(long)]
    pub keep_theme: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Reject settings the timer cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.work_minutes == 0 || self.break_minutes == 0 {
            anyhow::bail!("work and break phases must be at least one minute long");
        }
        if self.tick_ms == 0 {
            anyhow::bail!("tick interval must be greater than zero");
        }
        self.durations()?;
        Ok(())
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn durations(&self) -> anyhow::Result<PhaseDurations> {
        PhaseDurations::from_minutes(self.work_minutes, self.break_minutes).ok_or_else(|| {
            anyhow::anyhow!(
                "phase lengths of {} and {} minutes are too long",
                self.work_minutes,
                self.break_minutes
            )
        })
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Timer behaviour selected on the command line
    pub fn timer_settings(&self) -> anyhow::Result<TimerSettings> {
        Ok(TimerSettings {
            durations: self.durations()?,
            tick_interval: self.tick_interval(),
            follow_phase_theme: !self.keep_theme,
        })
    }
}
