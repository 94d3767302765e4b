use std::collections::HashSet;
use std::sync::Arc;

use futures::StreamExt as _;
use tokio::sync::mpsc;

use crate::domain::repository::{PushProvider, SubscriberResolver};
use crate::domain::types::{AssignmentChanged, DispatchSummary, Locale};
use crate::usecase::compose::compose;
use crate::usecase::dispatch::PushDispatcher;

// ── NotifySubscribers ────────────────────────────────────────────────────────

/// Resolves a class's subscribed devices and pushes the change to them.
/// Runs after the reconciliation committed; failures are only logged.
pub struct NotifySubscribersUseCase<S: SubscriberResolver, P: PushProvider> {
    pub subscribers: S,
    pub dispatcher: PushDispatcher<P>,
    pub locale: Locale,
}

impl<S: SubscriberResolver, P: PushProvider> NotifySubscribersUseCase<S, P> {
    pub async fn execute(&self, event: &AssignmentChanged) -> DispatchSummary {
        let class_id = event.assignment.class_id;
        let subscribers = match self.subscribers.resolve(class_id).await {
            Ok(subscribers) => subscribers,
            Err(e) => {
                tracing::error!(error = %e, %class_id, "failed to resolve subscribers");
                return DispatchSummary::default();
            }
        };

        // A token registered by two subscribers is sent once.
        let mut seen = HashSet::new();
        let tokens: Vec<String> = subscribers
            .into_iter()
            .filter(|s| seen.insert(s.fcm_token.clone()))
            .map(|s| s.fcm_token)
            .collect();

        if tokens.is_empty() {
            tracing::debug!(%class_id, "no subscribed devices, skipping dispatch");
            return DispatchSummary::default();
        }

        let message = compose(event, self.locale);
        self.dispatcher.dispatch(&tokens, &message).await
    }
}

// ── FanoutWorker ─────────────────────────────────────────────────────────────

/// Consumes [`AssignmentChanged`] events until every sender is dropped.
///
/// Runs on its own task so a fan-out, once started, finishes even if the
/// request that produced the event has already completed.
pub struct FanoutWorker<S: SubscriberResolver, P: PushProvider> {
    pub usecase: Arc<NotifySubscribersUseCase<S, P>>,
    /// Events processed at the same time.
    pub concurrency: usize,
}

impl<S: SubscriberResolver, P: PushProvider> FanoutWorker<S, P> {
    pub async fn run(self, receiver: mpsc::Receiver<AssignmentChanged>) {
        let events = futures::stream::unfold(receiver, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        });

        events
            .for_each_concurrent(self.concurrency.max(1), |event| {
                let usecase = Arc::clone(&self.usecase);
                async move {
                    let summary = usecase.execute(&event).await;
                    tracing::info!(
                        assignment_id = %event.assignment.id,
                        class_id = %event.assignment.class_id,
                        report_type = %event.report_type,
                        attempted = summary.attempted,
                        succeeded = summary.succeeded,
                        failed = summary.failed,
                        "fan-out finished"
                    );
                }
            })
            .await;

        tracing::info!("event channel closed, fan-out worker stopping");
    }
}
