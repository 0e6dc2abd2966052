//! Pomodoro cycle phases

use serde::{Deserialize, Serialize};

/// Current stage of the pomodoro cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Idle,
    Work,
    Rest,
    Done,
}

impl Phase {
    /// Phase entered when the step counter reaches `step`.
    ///
    /// Odd steps are work intervals, even steps are rest intervals.
    pub fn for_step(step: u32) -> Self {
        if step % 2 == 1 {
            Phase::Work
        } else {
            Phase::Rest
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Work => "work",
            Phase::Rest => "rest",
            Phase::Done => "done",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}
