//! Timer state structure and management

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::Phase;
use crate::{error::TimerError, utils::format_display};

/// Default length of a work interval (25 minutes)
pub const DEFAULT_WORK_DURATION: Duration = Duration::from_secs(1500);
/// Default length of a rest interval (5 minutes)
pub const DEFAULT_REST_DURATION: Duration = Duration::from_secs(300);

/// Interval lengths for the two kinds of pomodoro step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Durations {
    pub work: Duration,
    pub rest: Duration,
}

impl Durations {
    /// Create interval lengths, rejecting zero durations
    pub fn new(work: Duration, rest: Duration) -> Result<Self, TimerError> {
        if work.is_zero() || rest.is_zero() {
            return Err(TimerError::InvalidDuration);
        }
        Ok(Self { work, rest })
    }

    /// Interval length for the given step: odd steps work, even steps rest
    pub fn for_step(&self, step: u32) -> Duration {
        if step % 2 == 1 {
            self.work
        } else {
            self.rest
        }
    }
}

impl Default for Durations {
    fn default() -> Self {
        Self {
            work: DEFAULT_WORK_DURATION,
            rest: DEFAULT_REST_DURATION,
        }
    }
}

/// Countdown and cycle state held for the lifetime of the app
#[derive(Debug, Clone)]
pub struct TimerState {
    pub durations: Durations,
    /// Length of the current (or upcoming) interval
    pub duration: Duration,
    /// Frozen remaining time; only authoritative while `end_at` is `None`
    pub remaining: Duration,
    pub phase: Phase,
    pub step_count: u32,
    /// Set iff the countdown is running
    pub end_at: Option<Instant>,
    pub display: String,
}

impl TimerState {
    /// Create an idle state at step zero
    pub fn new(durations: Durations) -> Self {
        Self {
            durations,
            duration: Duration::ZERO,
            remaining: Duration::ZERO,
            phase: Phase::Idle,
            step_count: 0,
            end_at: None,
            display: format_display(Duration::ZERO),
        }
    }

    pub fn is_running(&self) -> bool {
        self.end_at.is_some()
    }

    /// Remaining time as of `now`, clamped at zero
    pub fn remaining_at(&self, now: Instant) -> Duration {
        match self.end_at {
            Some(end_at) => end_at.saturating_duration_since(now),
            None => self.remaining,
        }
    }

    /// Freeze the countdown at its value as of `now`
    ///
    /// Returns `false` when nothing was running.
    pub fn freeze(&mut self, now: Instant) -> bool {
        let Some(end_at) = self.end_at.take() else {
            return false;
        };
        self.remaining = end_at.saturating_duration_since(now);
        self.display = format_display(self.remaining);
        true
    }

    /// Load an interval without starting it
    pub fn load(&mut self, duration: Duration) {
        self.duration = duration;
        self.remaining = duration;
        self.display = format_display(duration);
    }

    pub fn snapshot(&self, now: Instant) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase,
            step_count: self.step_count,
            remaining_ms: duration_ms(self.remaining_at(now)),
            duration_ms: duration_ms(self.duration),
            display: self.display.clone(),
            running: self.is_running(),
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(Durations::default())
    }
}

/// Observable view of the timer handed to subscribers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    pub phase: Phase,
    pub step_count: u32,
    pub remaining_ms: u64,
    pub duration_ms: u64,
    pub display: String,
    pub running: bool,
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_pomodoro() {
        let state = TimerState::default();
        assert_eq!(state.durations.work, Duration::from_secs(1500));
        assert_eq!(state.durations.rest, Duration::from_secs(300));
        assert_eq!(state.step_count, 0);
        assert_eq!(state.phase, Phase::Idle);
        assert!(!state.is_running());
        assert_eq!(state.display, "00:00");
    }

    #[test]
    fn durations_reject_zero() {
        assert_eq!(
            Durations::new(Duration::ZERO, Duration::from_secs(5)),
            Err(TimerError::InvalidDuration)
        );
        assert!(Durations::new(Duration::from_secs(1), Duration::from_secs(1)).is_ok());
    }

    #[test]
    fn for_step_alternates() {
        let durations = Durations::default();
        assert_eq!(durations.for_step(0), DEFAULT_REST_DURATION);
        assert_eq!(durations.for_step(1), DEFAULT_WORK_DURATION);
        assert_eq!(durations.for_step(2), DEFAULT_REST_DURATION);
    }

    #[tokio::test(start_paused = true)]
    async fn remaining_is_clamped_past_the_deadline() {
        let mut state = TimerState::default();
        let now = Instant::now();
        state.end_at = Some(now + Duration::from_secs(2));

        assert_eq!(state.remaining_at(now), Duration::from_secs(2));
        assert_eq!(state.remaining_at(now + Duration::from_secs(5)), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn freeze_is_a_noop_when_idle() {
        let mut state = TimerState::default();
        state.load(Duration::from_secs(42));
        assert!(!state.freeze(Instant::now()));
        assert_eq!(state.remaining, Duration::from_secs(42));
        assert_eq!(state.display, "00:42");
    }
}
