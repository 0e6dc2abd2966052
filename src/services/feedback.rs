//! Haptic and audible feedback

use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Feedback {
    /// A countdown finished
    Success,
}

/// Device alert API (haptics on a watch)
pub trait FeedbackDevice: Send + Sync {
    fn play(&self, feedback: Feedback);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogFeedback;

impl FeedbackDevice for LogFeedback {
    fn play(&self, feedback: Feedback) {
        info!("Feedback played: {:?}", feedback);
    }
}

/// Rings the terminal bell
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl FeedbackDevice for TerminalBell {
    fn play(&self, feedback: Feedback) {
        let mut stderr = std::io::stderr();
        if let Err(e) = stderr.write_all(b"\x07").and_then(|_| stderr.flush()) {
            warn!("Failed to ring terminal bell for {:?}: {}", feedback, e);
        }
    }
}
