//! Local notification scheduling

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Identifier shared by every countdown notification
pub const TIMER_NOTIFICATION_ID: &str = "TimerNotification";

/// A notification to deliver at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRequest {
    pub id: String,
    pub fire_at: DateTime<Utc>,
    pub title: String,
    pub body: String,
}

impl NotificationRequest {
    /// The "timer ended" alert scheduled when a countdown starts
    pub fn timer_ended(fire_at: DateTime<Utc>) -> Self {
        Self {
            id: TIMER_NOTIFICATION_ID.to_string(),
            fire_at,
            title: "Timer Ended".to_string(),
            body: "Your countdown timer has finished.".to_string(),
        }
    }
}

/// Kinds of notification permission to ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionKinds {
    pub alert: bool,
    pub sound: bool,
}

impl PermissionKinds {
    pub const ALERT_AND_SOUND: Self = Self {
        alert: true,
        sound: true,
    };
}

/// Operating system notification center
///
/// Scheduling is fire-and-forget: implementations deliver asynchronously and
/// the timer never depends on the outcome.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Schedule a notification, returning its request id
    fn schedule(&self, request: NotificationRequest) -> String;

    /// Cancel every pending notification
    fn cancel_all(&self);

    /// Ask the user for permission to post notifications
    async fn request_permission(&self, kinds: PermissionKinds) -> anyhow::Result<bool>;
}

/// Notification service that only logs, for headless hosts
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl NotificationService for LogNotifier {
    fn schedule(&self, request: NotificationRequest) -> String {
        info!(
            "Notification '{}' scheduled for {}: {}",
            request.title, request.fire_at, request.body
        );
        request.id
    }

    fn cancel_all(&self) {
        info!("Pending notifications cancelled");
    }

    async fn request_permission(&self, _kinds: PermissionKinds) -> anyhow::Result<bool> {
        Ok(true)
    }
}
