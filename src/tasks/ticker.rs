//! Periodic tick sources driving the countdown

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use tokio::{
    runtime::Handle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Countdown recomputation period
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub type TickFn = Box<dyn FnMut() + Send + 'static>;

/// Scheduler that calls a callback once per period until cancelled
pub trait TickSource: Send + Sync {
    /// Arm a repeating callback; the first call happens one `period` from now
    fn arm(&self, period: Duration, on_tick: TickFn) -> TimerHandle;
}

/// Owned handle to an armed tick source
///
/// Cancelling (explicitly or by dropping) guarantees the callback is not
/// invoked again.
#[must_use = "dropping a TimerHandle cancels the ticks"]
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Tick source backed by a tokio interval task
#[derive(Debug, Clone)]
pub struct TokioTicker {
    runtime: Handle,
}

impl TokioTicker {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }

    /// Use the runtime of the calling task
    ///
    /// Must be called from within a tokio runtime.
    pub fn current() -> Self {
        Self::new(Handle::current())
    }
}

impl TickSource for TokioTicker {
    fn arm(&self, period: Duration, mut on_tick: TickFn) -> TimerHandle {
        let task = self.runtime.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                on_tick();
            }
        });

        debug!("Tick task armed with period {:?}", period);
        TimerHandle::new(move || {
            task.abort();
            debug!("Tick task cancelled");
        })
    }
}

#[derive(Default)]
struct TickSlot {
    /// Bumped on every arm and cancel so stale handles and callbacks are ignored
    generation: u64,
    on_tick: Option<TickFn>,
}

/// Tick source driven from outside, e.g. by a platform scheduler
#[derive(Clone, Default)]
pub struct ManualTicker {
    slot: Arc<Mutex<TickSlot>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.slot().on_tick.is_some()
    }

    /// Deliver one tick; returns `false` when nothing is armed
    pub fn fire(&self) -> bool {
        let (generation, mut on_tick) = {
            let mut slot = self.slot();
            match slot.on_tick.take() {
                Some(on_tick) => (slot.generation, on_tick),
                None => return false,
            }
        };

        // The slot is unlocked here; the callback may cancel or re-arm.
        on_tick();

        let mut slot = self.slot();
        if slot.generation == generation {
            slot.on_tick = Some(on_tick);
        }
        true
    }

    fn slot(&self) -> MutexGuard<'_, TickSlot> {
        lock_slot(&self.slot)
    }
}

fn lock_slot(slot: &Mutex<TickSlot>) -> MutexGuard<'_, TickSlot> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

impl TickSource for ManualTicker {
    fn arm(&self, _period: Duration, on_tick: TickFn) -> TimerHandle {
        let generation = {
            let mut slot = self.slot();
            slot.generation += 1;
            slot.on_tick = Some(on_tick);
            slot.generation
        };

        let slot = Arc::downgrade(&self.slot);
        TimerHandle::new(move || {
            if let Some(slot) = slot.upgrade() {
                let mut slot = lock_slot(&slot);
                if slot.generation == generation {
                    slot.generation += 1;
                    slot.on_tick = None;
                }
            }
        })
    }
}

impl std::fmt::Debug for ManualTicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualTicker")
            .field("armed", &self.is_armed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting() -> (Arc<AtomicUsize>, TickFn) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let on_tick: TickFn = Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (count, on_tick)
    }

    #[test]
    fn manual_ticker_fires_until_cancelled() {
        let ticker = ManualTicker::new();
        let (count, on_tick) = counting();

        let handle = ticker.arm(TICK_PERIOD, on_tick);
        assert!(ticker.fire());
        assert!(ticker.fire());
        assert_eq!(count.load(Ordering::SeqCst), 2);

        handle.cancel();
        assert!(!ticker.is_armed());
        assert!(!ticker.fire());
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn stale_handle_does_not_cancel_a_newer_arm() {
        let ticker = ManualTicker::new();
        let (_, first) = counting();
        let (count, second) = counting();

        let old = ticker.arm(TICK_PERIOD, first);
        let _new = ticker.arm(TICK_PERIOD, second);
        drop(old);

        assert!(ticker.fire());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_may_cancel_its_own_handle() {
        let ticker = ManualTicker::new();
        let slot: Arc<Mutex<Option<TimerHandle>>> = Arc::new(Mutex::new(None));

        let inner = Arc::clone(&slot);
        let handle = ticker.arm(
            TICK_PERIOD,
            Box::new(move || {
                if let Some(handle) = inner.lock().unwrap().take() {
                    handle.cancel();
                }
            }),
        );
        *slot.lock().unwrap() = Some(handle);

        assert!(ticker.fire());
        assert!(!ticker.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_ticker_ticks_once_per_period() {
        let ticker = TokioTicker::current();
        let (count, on_tick) = counting();

        let handle = ticker.arm(TICK_PERIOD, on_tick);
        time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);

        handle.cancel();
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }
}
