//! Notification Dispatcher: runs the Notifier off the request path.
//!
//! Handlers enqueue the stored submission and return immediately; a single
//! background worker drains the queue and logs each outcome.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::contact::models::StoredSubmission;
use crate::contact::notifier::{NotifyError, Notifier};

const QUEUE_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct NotificationDispatcher {
    tx: mpsc::Sender<StoredSubmission>,
}

impl NotificationDispatcher {
    /// Starts the worker on the current tokio runtime.
    pub fn spawn(notifier: Arc<dyn Notifier>, timeout: Duration) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let handle = tokio::spawn(run_worker(rx, notifier, timeout));
        (Self { tx }, handle)
    }

    /// Never blocks. A full or closed queue drops the notification.
    pub fn dispatch(&self, submission: StoredSubmission) {
        if let Err(e) = self.tx.try_send(submission) {
            let reason = match e {
                mpsc::error::TrySendError::Full(_) => "queue full",
                mpsc::error::TrySendError::Closed(_) => "worker stopped",
            };
            warn!("Dropping contact notification: {reason}");
        }
    }
}

async fn run_worker(
    mut rx: mpsc::Receiver<StoredSubmission>,
    notifier: Arc<dyn Notifier>,
    timeout: Duration,
) {
    while let Some(submission) = rx.recv().await {
        match tokio::time::timeout(timeout, notifier.notify(&submission)).await {
            Ok(Ok(())) => info!("Contact notification sent for {}", submission.name),
            Ok(Err(NotifyError::NotConfigured)) => {
                info!("Mail not configured; skipping contact notification")
            }
            Ok(Err(e)) => warn!("Contact notification failed: {e}"),
            Err(_) => warn!(
                "Contact notification timed out after {}s",
                timeout.as_secs()
            ),
        }
    }
    info!("Notification worker stopped");
}
