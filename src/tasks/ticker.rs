//! Tokio-backed tick scheduler

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
    time::Duration,
};
use tokio::{
    task::AbortHandle,
    time::{interval_at, Instant},
};
use tracing::{debug, warn};

use super::{IntervalScheduler, TickCallback, TickHandle};

/// Runs each schedule as its own tokio task; cancelling aborts the task.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Default)]
pub struct TokioTicker {
    next_id: AtomicU64,
    tasks: Mutex<HashMap<TickHandle, AbortHandle>>,
}

impl TokioTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of schedules that have not been cancelled
    pub fn active_count(&self) -> usize {
        self.tasks.lock().map(|tasks| tasks.len()).unwrap_or(0)
    }
}

impl IntervalScheduler for TokioTicker {
    fn schedule(&self, period: Duration, on_tick: TickCallback) -> TickHandle {
        let handle = TickHandle::new(self.next_id.fetch_add(1, Ordering::Relaxed));

        let task = tokio::spawn(async move {
            // interval() completes its first tick immediately; start one
            // period out instead.
            let mut interval = interval_at(Instant::now() + period, period);
            loop {
                interval.tick().await;
                on_tick(handle, period);
            }
        });

        match self.tasks.lock() {
            Ok(mut tasks) => {
                tasks.insert(handle, task.abort_handle());
            }
            Err(e) => {
                warn!("Failed to register {}: {}, aborting it", handle, e);
                task.abort();
            }
        }

        debug!("Scheduled {} every {:?}", handle, period);
        handle
    }

    fn cancel(&self, handle: TickHandle) {
        let task = match self.tasks.lock() {
            Ok(mut tasks) => tasks.remove(&handle),
            Err(e) => {
                warn!("Failed to lock tick schedules: {}", e);
                None
            }
        };

        if let Some(task) = task {
            task.abort();
            debug!("Cancelled {}", handle);
        }
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        if let Ok(tasks) = self.tasks.get_mut() {
            for (_, task) in tasks.drain() {
                task.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use pretty_assertions::assert_eq;

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, TickCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        (count, Arc::new(move |_: TickHandle, _: Duration| {
            seen.fetch_add(1, Ordering::SeqCst);
        }))
    }

    #[tokio::test(start_paused = true)]
    async fn first_tick_waits_a_full_interval() {
        let ticker = TokioTicker::new();
        let (count, on_tick) = counter();
        ticker.schedule(Duration::from_secs(1), on_tick);

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_schedule_stops_ticking() {
        let ticker = TokioTicker::new();
        let (count, on_tick) = counter();
        let handle = ticker.schedule(Duration::from_secs(1), on_tick);

        tokio::time::sleep(Duration::from_millis(2500)).await;
        ticker.cancel(handle);
        assert_eq!(ticker.active_count(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);

        // cancelling twice is harmless
        ticker.cancel(handle);
    }

    #[tokio::test(start_paused = true)]
    async fn schedules_get_distinct_handles() {
        let ticker = TokioTicker::new();
        let (_, first) = counter();
        let (_, second) = counter();

        let a = ticker.schedule(Duration::from_secs(1), first);
        let b = ticker.schedule(Duration::from_secs(1), second);

        assert_ne!(a, b);
        assert_eq!(ticker.active_count(), 2);
    }
}
