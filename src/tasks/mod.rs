//! Background tasks module
//!
//! Tick sources that drive the countdown and the phase loop run by the host.

pub mod pomodoro_cycle;
pub mod ticker;

// Re-export main items
pub use pomodoro_cycle::run_phases;
pub use ticker::{ManualTicker, TickSource, TimerHandle, TokioTicker, TICK_PERIOD};
