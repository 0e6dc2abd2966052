//! Recording test doubles for the collaborator services

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;

use crate::services::{
    Feedback, FeedbackDevice, NotificationRequest, NotificationService, PermissionKinds,
};

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    scheduled: Mutex<Vec<NotificationRequest>>,
    cancellations: AtomicUsize,
    permission_requests: AtomicUsize,
    denied: AtomicBool,
}

impl RecordingNotifier {
    pub fn scheduled(&self) -> Vec<NotificationRequest> {
        self.scheduled.lock().unwrap().clone()
    }

    pub fn cancellations(&self) -> usize {
        self.cancellations.load(Ordering::SeqCst)
    }

    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }

    pub fn deny_permission(&self) {
        self.denied.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl NotificationService for RecordingNotifier {
    fn schedule(&self, request: NotificationRequest) -> String {
        let id = request.id.clone();
        self.scheduled.lock().unwrap().push(request);
        id
    }

    fn cancel_all(&self) {
        self.cancellations.fetch_add(1, Ordering::SeqCst);
    }

    async fn request_permission(&self, _kinds: PermissionKinds) -> anyhow::Result<bool> {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        Ok(!self.denied.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Default)]
pub struct RecordingFeedback {
    played: Mutex<Vec<Feedback>>,
}

impl RecordingFeedback {
    pub fn played(&self) -> Vec<Feedback> {
        self.played.lock().unwrap().clone()
    }
}

impl FeedbackDevice for RecordingFeedback {
    fn play(&self, feedback: Feedback) {
        self.played.lock().unwrap().push(feedback);
    }
}
