//! Desktop notifications via the freedesktop / platform notification daemon

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use notify_rust::Notification;
use tokio::{runtime::Handle, task::JoinHandle, time::sleep};
use tracing::{debug, error, info};

use super::notifications::{NotificationRequest, NotificationService, PermissionKinds};

/// Posts notifications on the desktop once their fire time arrives
#[derive(Debug)]
pub struct DesktopNotifier {
    runtime: Handle,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl DesktopNotifier {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            pending: Mutex::new(Vec::new()),
        }
    }

    fn pending(&self) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl NotificationService for DesktopNotifier {
    fn schedule(&self, request: NotificationRequest) -> String {
        let delay = (request.fire_at - Utc::now()).to_std().unwrap_or_default();
        let id = request.id.clone();
        debug!("Desktop notification '{}' due in {:?}", id, delay);

        let label = id.clone();
        let task = self.runtime.spawn(async move {
            sleep(delay).await;
            let shown = tokio::task::spawn_blocking(move || {
                Notification::new()
                    .appname("poca")
                    .summary(&request.title)
                    .body(&request.body)
                    .show()
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .await;

            match shown {
                Ok(Ok(())) => info!("Desktop notification '{}' shown", label),
                Ok(Err(e)) => error!("Failed to show desktop notification: {}", e),
                Err(e) => error!("Desktop notification task failed: {}", e),
            }
        });

        let mut pending = self.pending();
        pending.retain(|task| !task.is_finished());
        pending.push(task);
        id
    }

    fn cancel_all(&self) {
        let mut pending = self.pending();
        let count = pending.len();
        for task in pending.drain(..) {
            task.abort();
        }
        debug!("Cancelled {} pending desktop notifications", count);
    }

    async fn request_permission(&self, _kinds: PermissionKinds) -> anyhow::Result<bool> {
        // Desktop daemons do not gate posting behind a permission prompt.
        Ok(true)
    }
}
