//! Mascot animation parameters for phase transitions

use std::time::Duration;

use serde::Serialize;

use crate::state::{Transition, Trigger};

/// Spring response used for every mascot move
pub const SPRING_RESPONSE: Duration = Duration::from_secs(1);

/// Offset of the mascot from its resting anchor, in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MascotOffset {
    pub width: f32,
    pub height: f32,
}

impl MascotOffset {
    /// Below the bottom edge, out of view
    pub const HIDDEN: Self = Self {
        width: 0.0,
        height: 200.0,
    };

    /// Peeking up from the bottom edge
    pub const SURFACED: Self = Self {
        width: 0.0,
        height: 26.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MascotAnimation {
    pub target: MascotOffset,
    pub spring_response: Duration,
}

/// Animation to play for a transition, if any
pub fn animation_for(transition: &Transition) -> Option<MascotAnimation> {
    let target = match transition.trigger {
        Trigger::Advanced | Trigger::Reset => MascotOffset::HIDDEN,
        Trigger::Completed | Trigger::Skipped => MascotOffset::SURFACED,
        Trigger::Started | Trigger::Stopped => return None,
    };

    Some(MascotAnimation {
        target,
        spring_response: SPRING_RESPONSE,
    })
}
