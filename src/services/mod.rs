//! External collaborator services
//!
//! Notification scheduling and device feedback. The timer treats these as
//! opaque side effects.

pub mod desktop;
pub mod feedback;
pub mod notifications;

// Re-export main types
pub use desktop::DesktopNotifier;
pub use feedback::{Feedback, FeedbackDevice, LogFeedback, TerminalBell};
pub use notifications::{
    LogNotifier, NotificationRequest, NotificationService, PermissionKinds, TIMER_NOTIFICATION_ID,
};
