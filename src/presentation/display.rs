//! One-line rendering of timer events for terminal hosts

use serde_json::json;

use super::animation_for;
use crate::state::TimerEvent;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DisplayFormat {
    #[default]
    Text,
    Json,
}

/// Render an event as a single line
pub fn render_line(event: &TimerEvent, format: DisplayFormat) -> String {
    let snapshot = &event.snapshot;
    match format {
        DisplayFormat::Text => match &event.transition {
            Some(transition) => format!(
                "[{}] {:<5} step {} {:?}",
                snapshot.display, snapshot.phase, snapshot.step_count, transition.trigger
            ),
            None => format!(
                "[{}] {:<5} step {}",
                snapshot.display, snapshot.phase, snapshot.step_count
            ),
        },
        DisplayFormat::Json => {
            let animation = event.transition.as_ref().and_then(animation_for);
            json!({
                "snapshot": snapshot,
                "transition": event.transition,
                "animation": animation,
            })
            .to_string()
        }
    }
}
