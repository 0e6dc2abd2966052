//! Watch face time formatting

use std::time::Duration;

/// Format a remaining time as `MM:SS`.
///
/// Sub-second precision is floored. Minutes are not wrapped into hours, so an
/// interval of 100 minutes renders as `100:00`.
pub fn format_display(remaining: Duration) -> String {
    let total = remaining.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}
