//! Error types for timer operations

use std::time::Duration;

use thiserror::Error;

/// Errors returned by operations that accept a duration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// Countdowns must last longer than zero
    #[error("countdown duration must be greater than zero")]
    InvalidDuration,

    /// The duration cannot be added to the monotonic clock
    #[error("countdown duration {0:?} is too large")]
    DurationOutOfRange(Duration),
}
