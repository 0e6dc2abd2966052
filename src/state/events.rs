//! Events published to timer subscribers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Phase, TimerSnapshot};

/// What caused a phase transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Trigger {
    Started,
    Stopped,
    /// The countdown reached zero
    Completed,
    /// The step counter moved to the next interval
    Advanced,
    Reset,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub phase: Phase,
    pub trigger: Trigger,
    pub at: DateTime<Utc>,
}

impl Transition {
    pub fn new(phase: Phase, trigger: Trigger) -> Self {
        Self {
            phase,
            trigger,
            at: Utc::now(),
        }
    }
}

/// Delivered after every mutation; plain countdown ticks carry no transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerEvent {
    pub snapshot: TimerSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Transition>,
}

impl TimerEvent {
    pub fn tick(snapshot: TimerSnapshot) -> Self {
        Self {
            snapshot,
            transition: None,
        }
    }

    pub fn transition(snapshot: TimerSnapshot, trigger: Trigger) -> Self {
        let transition = Transition::new(snapshot.phase, trigger);
        Self {
            snapshot,
            transition: Some(transition),
        }
    }

    pub fn trigger(&self) -> Option<Trigger> {
        self.transition.as_ref().map(|t| t.trigger)
    }
}
