use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::repository::EventPublisher;
use crate::domain::types::AssignmentChanged;

/// Publishes onto the bounded channel drained by the fan-out worker.
///
/// A full channel makes the publisher wait, which throttles ingestion to
/// what fan-out can keep up with. The wait happens on a detached task, so a
/// dropped request still hands its committed change to the worker.
#[derive(Clone)]
pub struct ChannelPublisher {
    pub sender: mpsc::Sender<AssignmentChanged>,
}

impl EventPublisher for ChannelPublisher {
    async fn publish(&self, event: AssignmentChanged) {
        let assignment_id = event.assignment.id;
        let event = match self.sender.try_send(event) {
            Ok(()) => return,
            Err(TrySendError::Closed(_)) => {
                tracing::warn!(%assignment_id, "fan-out worker stopped, dropping event");
                return;
            }
            Err(TrySendError::Full(event)) => event,
        };

        let sender = self.sender.clone();
        let handoff = tokio::spawn(async move {
            if sender.send(event).await.is_err() {
                tracing::warn!(%assignment_id, "fan-out worker stopped, dropping event");
            }
        });
        if let Err(e) = handoff.await {
            tracing::error!(error = %e, %assignment_id, "event hand-off task failed");
        }
    }
}
