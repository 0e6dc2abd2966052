//! Pomodoro countdown and phase cycle
//!
//! A single [`PomodoroTimer`] owns the countdown, the phase and the step
//! counter. All mutation happens under one mutex, whether it comes from a
//! control operation or from the armed tick source. Subscribers are notified
//! after the lock is released, in the order the state changed.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::{
    Durations, Listeners, Phase, Subscription, TimerEvent, TimerSnapshot, TimerState, Trigger,
};
use crate::{
    error::TimerError,
    services::{Feedback, FeedbackDevice, NotificationRequest, NotificationService, PermissionKinds},
    tasks::ticker::{TickSource, TimerHandle, TICK_PERIOD},
    utils::format_display,
};

#[derive(Debug)]
struct Inner {
    state: TimerState,
    ticker: Option<TimerHandle>,
    notification_id: Option<String>,
    /// Bumped on every start; ticks armed for an older countdown are ignored
    countdown: u64,
    /// Events produced by the current mutation
    outbox: Vec<TimerEvent>,
}

impl Inner {
    fn publish(&mut self, trigger: Option<Trigger>) {
        let snapshot = self.state.snapshot(Instant::now());
        let event = match trigger {
            Some(trigger) => TimerEvent::transition(snapshot, trigger),
            None => TimerEvent::tick(snapshot),
        };
        self.outbox.push(event);
    }
}

/// Events waiting for delivery, in the order the state changed
#[derive(Default)]
struct Delivery {
    queue: VecDeque<TimerEvent>,
    draining: bool,
}

struct Shared {
    inner: Mutex<Inner>,
    delivery: Mutex<Delivery>,
    listeners: Arc<Listeners>,
    tick_source: Arc<dyn TickSource>,
    notifier: Arc<dyn NotificationService>,
    feedback: Arc<dyn FeedbackDevice>,
}

/// Pomodoro view-model: countdown, phase and step counter
///
/// Cloning yields another handle to the same timer.
#[derive(Clone)]
pub struct PomodoroTimer {
    shared: Arc<Shared>,
}

impl PomodoroTimer {
    pub fn new(
        durations: Durations,
        tick_source: Arc<dyn TickSource>,
        notifier: Arc<dyn NotificationService>,
        feedback: Arc<dyn FeedbackDevice>,
    ) -> Self {
        info!(
            "Pomodoro timer created (work={:?}, rest={:?})",
            durations.work, durations.rest
        );
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state: TimerState::new(durations),
                    ticker: None,
                    notification_id: None,
                    countdown: 0,
                    outbox: Vec::new(),
                }),
                delivery: Mutex::new(Delivery::default()),
                listeners: Listeners::new(),
                tick_source,
                notifier,
                feedback,
            }),
        }
    }

    /// Register a listener called synchronously after every state change
    ///
    /// Events reach listeners in the order the state changed. When another
    /// thread is already delivering, it delivers this caller's events too.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&TimerEvent) + Send + Sync + 'static,
    {
        self.shared.listeners.subscribe(Arc::new(listener))
    }

    /// Ask for alert and sound permission; the outcome is only logged
    pub async fn request_notification_permission(&self) {
        match self
            .shared
            .notifier
            .request_permission(PermissionKinds::ALERT_AND_SOUND)
            .await
        {
            Ok(true) => info!("Notification permission granted"),
            Ok(false) => warn!("Notification permission denied, alerts will not be shown"),
            Err(e) => error!("Error requesting notification permission: {}", e),
        }
    }

    /// Start a countdown of `duration`
    ///
    /// A countdown that is already running is replaced. Zero durations are
    /// rejected and leave the timer untouched.
    pub fn start(&self, duration: Duration) -> Result<(), TimerError> {
        self.shared.mutate(|shared, inner| shared.start_locked(inner, duration))
    }

    /// Stop the countdown, freezing the remaining time. No-op when stopped.
    pub fn stop(&self) {
        self.shared.mutate(|shared, inner| {
            if shared.halt(inner) {
                info!("Countdown stopped at {}", inner.state.display);
                inner.publish(Some(Trigger::Stopped));
            }
        });
    }

    /// Recompute the countdown; called once per second while running
    pub fn tick(&self) {
        self.shared.tick(None);
    }

    /// Start the interval selected by the step counter's parity
    pub fn start_pomodoro(&self) -> Result<(), TimerError> {
        self.shared.mutate(|shared, inner| {
            let duration = inner.state.durations.for_step(inner.state.step_count);
            inner.state.remaining = duration;
            shared.start_locked(inner, duration)
        })
    }

    /// Stop and move to the next step without starting it
    pub fn next_pomodoro(&self) {
        self.shared.mutate(|shared, inner| {
            shared.halt(inner);

            let state = &mut inner.state;
            state.step_count += 1;
            state.phase = Phase::for_step(state.step_count);
            let duration = state.durations.for_step(state.step_count);
            state.load(duration);

            info!(
                "Advanced to step {} ({}, {})",
                state.step_count, state.phase, state.display
            );
            inner.publish(Some(Trigger::Advanced));
        });
    }

    /// Stop and reset the cycle to step zero
    pub fn stop_pomodoro(&self) {
        self.shared.mutate(|shared, inner| {
            shared.halt(inner);
            inner.state.step_count = 0;
            inner.state.phase = Phase::Idle;
            info!("Pomodoro cycle reset");
            inner.publish(Some(Trigger::Reset));
        });
    }

    /// Stop and mark the current phase done without advancing the step
    pub fn skip_phase(&self) {
        self.shared.mutate(|shared, inner| {
            shared.halt(inner);
            inner.state.phase = Phase::Done;
            info!("Skipped step {}", inner.state.step_count);
            inner.publish(Some(Trigger::Skipped));
        });
    }

    /// Replace the work and rest lengths used by future intervals
    pub fn set_durations(&self, durations: Durations) {
        self.shared.mutate(|_, inner| {
            debug!(
                "Durations updated (work={:?}, rest={:?})",
                durations.work, durations.rest
            );
            inner.state.durations = durations;
        });
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.shared.lock().state.snapshot(Instant::now())
    }

    pub fn phase(&self) -> Phase {
        self.shared.lock().state.phase
    }

    pub fn step_count(&self) -> u32 {
        self.shared.lock().state.step_count
    }

    pub fn remaining_time(&self) -> Duration {
        self.shared.lock().state.remaining_at(Instant::now())
    }

    pub fn display_string(&self) -> String {
        self.shared.lock().state.display.clone()
    }

    pub fn is_running(&self) -> bool {
        self.shared.lock().state.is_running()
    }

    pub fn durations(&self) -> Durations {
        self.shared.lock().state.durations
    }
}

impl std::fmt::Debug for PomodoroTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PomodoroTimer")
            .field("state", &self.shared.lock().state)
            .field("listeners", &self.shared.listeners)
            .finish()
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn delivery(&self) -> MutexGuard<'_, Delivery> {
        self.delivery.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` under the state lock, then deliver the events it produced
    ///
    /// Events are queued before the state lock is released, so the queue
    /// order is the order of the state changes.
    fn mutate<T>(self: &Arc<Self>, f: impl FnOnce(&Arc<Self>, &mut Inner) -> T) -> T {
        let result = {
            let mut inner = self.lock();
            let result = f(self, &mut inner);
            let events = std::mem::take(&mut inner.outbox);
            self.delivery().queue.extend(events);
            result
        };
        self.dispatch();
        result
    }

    /// Deliver queued events unless another caller is already delivering
    ///
    /// The active drainer also delivers events queued by other threads and by
    /// listeners calling back into the timer.
    fn dispatch(&self) {
        {
            let mut delivery = self.delivery();
            if delivery.draining {
                return;
            }
            delivery.draining = true;
        }

        loop {
            let next = {
                let mut delivery = self.delivery();
                let next = delivery.queue.pop_front();
                if next.is_none() {
                    delivery.draining = false;
                }
                next
            };
            match next {
                Some(event) => self.listeners.notify(&event),
                None => break,
            }
        }
    }

    fn start_locked(self: &Arc<Self>, inner: &mut Inner, duration: Duration) -> Result<(), TimerError> {
        if duration.is_zero() {
            warn!("Rejected countdown with zero duration");
            return Err(TimerError::InvalidDuration);
        }
        let now = Instant::now();
        let end_at = now
            .checked_add(duration)
            .ok_or(TimerError::DurationOutOfRange(duration))?;

        self.halt(inner);

        inner.state.duration = duration;
        inner.state.remaining = duration;
        inner.state.end_at = Some(end_at);
        inner.state.display = format_display(duration);

        inner.countdown += 1;
        let countdown = inner.countdown;
        let weak = Arc::downgrade(self);
        inner.ticker = Some(self.tick_source.arm(
            TICK_PERIOD,
            Box::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.tick(Some(countdown));
                }
            }),
        ));

        let request = NotificationRequest::timer_ended(fire_time(duration));
        inner.notification_id = Some(self.notifier.schedule(request));

        info!(
            "Countdown started for {} (step {}, {})",
            inner.state.display, inner.state.step_count, inner.state.phase
        );
        inner.publish(Some(Trigger::Started));
        Ok(())
    }

    /// Freeze the countdown and release the tick source and pending notification
    ///
    /// Returns `false` when no countdown was running.
    fn halt(&self, inner: &mut Inner) -> bool {
        if !inner.state.freeze(Instant::now()) {
            return false;
        }
        if let Some(ticker) = inner.ticker.take() {
            ticker.cancel();
        }
        if let Some(id) = inner.notification_id.take() {
            debug!("Cancelling notification {}", id);
            self.notifier.cancel_all();
        }
        true
    }

    /// `countdown` identifies the countdown a tick source was armed for;
    /// `None` ticks whatever is running.
    fn tick(self: &Arc<Self>, countdown: Option<u64>) {
        let completed = self.mutate(|shared, inner| {
            if countdown.is_some_and(|countdown| countdown != inner.countdown) {
                debug!("Ignoring tick from a replaced countdown");
                return false;
            }
            let Some(end_at) = inner.state.end_at else {
                debug!("Ignoring tick while stopped");
                return false;
            };

            let remaining = end_at.saturating_duration_since(Instant::now());
            inner.state.remaining = remaining;

            if remaining.is_zero() {
                inner.state.phase = Phase::Done;
                shared.halt(inner);
                inner.state.display = format_display(Duration::ZERO);
                info!("Countdown completed (step {})", inner.state.step_count);
                inner.publish(Some(Trigger::Completed));
                true
            } else {
                inner.state.display = format_display(remaining);
                inner.publish(None);
                false
            }
        });

        if completed {
            self.feedback.play(Feedback::Success);
        }
    }
}

fn fire_time(duration: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(duration)
        .ok()
        .and_then(|delta| Utc::now().checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
