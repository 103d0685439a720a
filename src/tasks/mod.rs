//! Background tasks module
//!
//! The countdown is driven by a cancellable interval scheduler. Production
//! code uses [`TokioTicker`], which spawns one tokio task per schedule;
//! [`ManualScheduler`] lets callers fire ticks by hand.

pub mod manual;
pub mod ticker;

use std::{fmt, sync::Arc, time::Duration};

// Re-export main types
pub use manual::ManualScheduler;
pub use ticker::TokioTicker;

/// Identifies one recurring tick schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TickHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick#{}", self.0)
    }
}

/// Invoked once per interval with the schedule's handle and the elapsed time
pub type TickCallback = Arc<dyn Fn(TickHandle, Duration) + Send + Sync>;

/// A source of recurring, cancellable ticks
pub trait IntervalScheduler: Send + Sync {
    /// Call `on_tick` every `interval` until cancelled. The first tick
    /// arrives one full interval after scheduling.
    fn schedule(&self, interval: Duration, on_tick: TickCallback) -> TickHandle;

    /// Stop a schedule. Unknown or already cancelled handles are ignored.
    fn cancel(&self, handle: TickHandle);
}
