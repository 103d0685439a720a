//! Hand-driven tick scheduler
//!
//! Nothing fires on its own: the caller decides when each tick happens.
//! Useful for deterministic tests and for embedding the timer in a host that
//! already owns a frame or event loop. Only the most recent cancelled
//! schedules are kept for late delivery, so memory stays bounded however
//! many times the countdown restarts.

use std::{collections::VecDeque, sync::Mutex, time::Duration};
use tracing::warn;

use super::{IntervalScheduler, TickCallback, TickHandle};

/// Cancelled schedules kept around for [`ManualScheduler::fire_late`]
pub const RETIRED_LIMIT: usize = 4;

struct Schedule {
    handle: TickHandle,
    interval: Duration,
    on_tick: TickCallback,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    active: Vec<Schedule>,
    /// Oldest first, at most `RETIRED_LIMIT` long
    retired: VecDeque<Schedule>,
}

#[derive(Default)]
pub struct ManualScheduler {
    registry: Mutex<Registry>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles that are scheduled and not cancelled, oldest first
    pub fn active_handles(&self) -> Vec<TickHandle> {
        self.with_registry(|registry| {
            registry.active.iter().map(|s| s.handle).collect()
        })
        .unwrap_or_default()
    }

    /// Total number of schedules ever created
    pub fn scheduled_count(&self) -> usize {
        self.with_registry(|registry| registry.next_id as usize)
            .unwrap_or(0)
    }

    /// Schedules currently held in memory, active and retired
    pub fn retained_count(&self) -> usize {
        self.with_registry(|registry| registry.active.len() + registry.retired.len())
            .unwrap_or(0)
    }

    /// Deliver one tick on `handle` if it is still active
    pub fn fire(&self, handle: TickHandle) -> bool {
        self.fire_if(handle, false)
    }

    /// Deliver one tick on `handle` even if it was cancelled, as a callback
    /// that was already in flight when the cancel happened would be. Returns
    /// false once the schedule has aged out of the retired list.
    pub fn fire_late(&self, handle: TickHandle) -> bool {
        self.fire_if(handle, true)
    }

    /// Deliver one tick to every active schedule, returning how many fired
    pub fn fire_all(&self) -> usize {
        self.active_handles()
            .into_iter()
            .filter(|handle| self.fire(*handle))
            .count()
    }

    /// Fire every active schedule `ticks` times in a row
    pub fn advance(&self, ticks: usize) {
        for _ in 0..ticks {
            self.fire_all();
        }
    }

    fn fire_if(&self, handle: TickHandle, include_cancelled: bool) -> bool {
        // Clone the callback out so it can schedule or cancel re-entrantly.
        let target = self.with_registry(|registry| {
            let retired = registry.retired.iter().filter(|_| include_cancelled);
            registry
                .active
                .iter()
                .chain(retired)
                .find(|s| s.handle == handle)
                .map(|s| (s.on_tick.clone(), s.interval))
        });

        match target.flatten() {
            Some((on_tick, interval)) => {
                on_tick(handle, interval);
                true
            }
            None => false,
        }
    }

    fn with_registry<T>(&self, f: impl FnOnce(&mut Registry) -> T) -> Option<T> {
        match self.registry.lock() {
            Ok(mut registry) => Some(f(&mut registry)),
            Err(e) => {
                warn!("Failed to lock manual schedules: {}", e);
                None
            }
        }
    }
}

impl IntervalScheduler for ManualScheduler {
    fn schedule(&self, interval: Duration, on_tick: TickCallback) -> TickHandle {
        self.with_registry(|registry| {
            let handle = TickHandle::new(registry.next_id);
            registry.next_id += 1;
            registry.active.push(Schedule {
                handle,
                interval,
                on_tick,
            });
            handle
        })
        .unwrap_or(TickHandle::new(u64::MAX))
    }

    fn cancel(&self, handle: TickHandle) {
        self.with_registry(|registry| {
            let Some(index) = registry.active.iter().position(|s| s.handle == handle) else {
                return;
            };
            let schedule = registry.active.remove(index);
            registry.retired.push_back(schedule);
            while registry.retired.len() > RETIRED_LIMIT {
                registry.retired.pop_front();
            }
        });
    }
}
