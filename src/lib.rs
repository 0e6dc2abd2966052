//! Poca - a pomodoro timer core for wearable watch faces
//!
//! This library tracks the countdown and the work/rest cycle, formats the
//! remaining time for display, and schedules a local notification for the
//! end of each countdown.

pub mod config;
pub mod error;
pub mod presentation;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::Config;
pub use error::TimerError;
pub use state::{Durations, Phase, PomodoroTimer, Subscription, TimerEvent, TimerSnapshot, Trigger};
pub use utils::{format_display, shutdown_signal};
