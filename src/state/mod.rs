//! State management module
//!
//! The pomodoro timer, its data model, and the events it publishes.

pub mod events;
pub mod listeners;
pub mod phase;
pub mod pomodoro;
pub mod timer_state;

// Re-export main types
pub use events::{TimerEvent, Transition, Trigger};
pub use listeners::{Listener, Listeners, Subscription};
pub use phase::Phase;
pub use pomodoro::PomodoroTimer;
pub use timer_state::{Durations, TimerSnapshot, TimerState};
