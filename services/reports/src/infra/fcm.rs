//! Firebase Cloud Messaging HTTP v1 client.
//!
//! One `messages:send` request per token, at most `concurrency` in flight.
//! A refused access token fails the batch; everything else is reported per token.

use std::time::Duration;

use futures::StreamExt as _;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::domain::repository::PushProvider;
use crate::domain::types::{DeliveryOutcome, PushMessage};
use crate::error::PushError;

pub struct FcmClient {
    http: reqwest::Client,
    endpoint: String,
    access_token: String,
    concurrency: usize,
}

impl FcmClient {
    pub fn new(
        base_url: &str,
        project_id: &str,
        access_token: String,
        timeout: Duration,
        concurrency: usize,
    ) -> Result<Self, PushError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PushError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: format!(
                "{}/v1/projects/{project_id}/messages:send",
                base_url.trim_end_matches('/')
            ),
            access_token,
            concurrency: concurrency.max(1),
        })
    }
}

impl PushProvider for FcmClient {
    async fn send_batch(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<Vec<DeliveryOutcome>, PushError> {
        // Collected up front: holding the borrowing `Map` iterator across the
        // await below makes the future's `Send` proof fail (rustc #110338).
        let requests: Vec<_> = tokens
            .iter()
            .map(|token| {
                let request = self
                    .http
                    .post(&self.endpoint)
                    .bearer_auth(&self.access_token)
                    .json(&message_body(token, message));
                send_one(request, token.clone())
            })
            .collect();
        let results: Vec<Result<DeliveryOutcome, PushError>> = futures::stream::iter(requests)
            .buffered(self.concurrency)
            .collect()
            .await;
        results.into_iter().collect()
    }
}

async fn send_one(
    request: reqwest::RequestBuilder,
    token: String,
) -> Result<DeliveryOutcome, PushError> {
    let response = match request.send().await {
        Ok(response) => response,
        Err(e) => return Ok(DeliveryOutcome::failed(token, e.to_string())),
    };

    let status = response.status();
    if status.is_success() {
        return Ok(DeliveryOutcome::delivered(token));
    }

    let body = response.text().await.unwrap_or_default();
    let error = parse_error(&body);
    if rejects_credentials(status, error.as_ref()) {
        return Err(PushError::Rejected(status.as_u16()));
    }
    Ok(DeliveryOutcome::failed(token, failure_message(status, error)))
}

/// Request body for `projects.messages.send`.
fn message_body(token: &str, message: &PushMessage) -> serde_json::Value {
    serde_json::json!({
        "message": {
            "token": token,
            "notification": {
                "title": message.title,
                "body": message.body,
            },
            "data": message.data,
        }
    })
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
    #[serde(default)]
    details: Vec<ErrorCause>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorCause {
    error_code: Option<String>,
}

impl ErrorDetail {
    /// `FcmError.errorCode`, present when the failure is about the token.
    fn fcm_error_code(&self) -> Option<&str> {
        self.details.iter().find_map(|d| d.error_code.as_deref())
    }
}

fn parse_error(body: &str) -> Option<ErrorDetail> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error)
}

/// 401 always means the access token was refused. A 403 only does when FCM
/// gives no per-token error code, e.g. `SENDER_ID_MISMATCH` is per token.
fn rejects_credentials(status: StatusCode, error: Option<&ErrorDetail>) -> bool {
    match status {
        StatusCode::UNAUTHORIZED => true,
        StatusCode::FORBIDDEN => error.and_then(ErrorDetail::fcm_error_code).is_none(),
        _ => false,
    }
}

/// The provider's own message when the body carries one, else the status line.
fn failure_message(status: StatusCode, error: Option<ErrorDetail>) -> String {
    error
        .map(|e| e.message)
        .unwrap_or_else(|| format!("HTTP {status}"))
}
