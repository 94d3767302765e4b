use crate::domain::repository::PushProvider;
use crate::domain::types::{DispatchSummary, PushMessage};

// ── PushDispatcher ───────────────────────────────────────────────────────────

/// Best-effort delivery of one message to a batch of tokens.
///
/// Never fails: batch errors and per-token failures are logged and counted.
/// Nothing is retried.
pub struct PushDispatcher<P: PushProvider> {
    pub provider: P,
}

impl<P: PushProvider> PushDispatcher<P> {
    pub async fn dispatch(&self, tokens: &[String], message: &PushMessage) -> DispatchSummary {
        if tokens.is_empty() {
            return DispatchSummary::default();
        }

        let outcomes = match self.provider.send_batch(tokens, message).await {
            Ok(outcomes) => outcomes,
            Err(e) => {
                tracing::error!(error = %e, tokens = tokens.len(), "push batch failed");
                return DispatchSummary {
                    attempted: tokens.len(),
                    succeeded: 0,
                    failed: tokens.len(),
                };
            }
        };

        let mut summary = DispatchSummary {
            attempted: tokens.len(),
            ..Default::default()
        };
        for outcome in &outcomes {
            if outcome.success {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
                tracing::warn!(
                    token = %outcome.token,
                    error = outcome.error_message.as_deref().unwrap_or("unknown"),
                    "push delivery failed"
                );
            }
        }
        // Tokens the provider did not answer for count as failed.
        summary.failed += tokens.len().saturating_sub(outcomes.len());

        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "push batch sent"
        );
        summary
    }
}
