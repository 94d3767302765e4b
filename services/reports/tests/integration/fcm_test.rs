use std::collections::BTreeMap;

use classnote_reports::domain::repository::PushProvider;
use classnote_reports::domain::types::{DispatchSummary, PushMessage};
use classnote_reports::error::PushError;
use classnote_reports::usecase::dispatch::PushDispatcher;

use crate::helpers::{ACCESS_TOKEN, fcm_client as client, spawn_fake_fcm};

fn message() -> PushMessage {
    PushMessage {
        title: "Compilers".to_owned(),
        body: "A new assignment has been posted".to_owned(),
        data: BTreeMap::from([
            ("assignmentId".to_owned(), "a-1".to_owned()),
            ("reportType".to_owned(), "appeared".to_owned()),
        ]),
    }
}

fn tokens(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_owned()).collect()
}

// ── FcmClient ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_send_one_request_per_token() {
    let (base_url, fake) = spawn_fake_fcm().await;

    let outcomes = client(&base_url, ACCESS_TOKEN)
        .send_batch(&tokens(&["t1", "t2", "t3"]), &message())
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| o.success));
    assert_eq!(
        outcomes.iter().map(|o| o.token.as_str()).collect::<Vec<_>>(),
        vec!["t1", "t2", "t3"]
    );

    let received = fake.received.lock().unwrap();
    assert_eq!(received.len(), 3);
    let (project, body) = &received[0];
    assert_eq!(project, "classnote-test");
    assert_eq!(body["message"]["notification"]["title"], "Compilers");
    assert_eq!(body["message"]["data"]["reportType"], "appeared");
}

#[tokio::test]
async fn should_report_per_token_failures() {
    let (base_url, _fake) = spawn_fake_fcm().await;

    let outcomes = client(&base_url, ACCESS_TOKEN)
        .send_batch(&tokens(&["ok", "unregistered", "flaky"]), &message())
        .await
        .unwrap();

    assert!(outcomes[0].success);
    assert!(!outcomes[1].success);
    assert_eq!(
        outcomes[1].error_message.as_deref(),
        Some("Requested entity was not found.")
    );
    assert!(!outcomes[2].success);
    assert_eq!(
        outcomes[2].error_message.as_deref(),
        Some("HTTP 503 Service Unavailable")
    );
}

#[tokio::test]
async fn should_fail_batch_when_credentials_are_rejected() {
    let (base_url, fake) = spawn_fake_fcm().await;

    let result = client(&base_url, "expired")
        .send_batch(&tokens(&["t1", "t2"]), &message())
        .await;

    assert!(
        matches!(result, Err(PushError::Rejected(401))),
        "expected Rejected(401), got {result:?}"
    );
    assert!(fake.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_count_sender_id_mismatch_against_that_token_only() {
    let (base_url, fake) = spawn_fake_fcm().await;

    let outcomes = client(&base_url, ACCESS_TOKEN)
        .send_batch(&tokens(&["a", "other-project", "c"]), &message())
        .await
        .unwrap();
    assert!(outcomes[0].success);
    assert!(!outcomes[1].success);
    assert_eq!(outcomes[1].error_message.as_deref(), Some("SenderId mismatch"));
    assert!(outcomes[2].success);
    assert_eq!(fake.received.lock().unwrap().len(), 3);

    let summary = PushDispatcher {
        provider: client(&base_url, ACCESS_TOKEN),
    }
    .dispatch(&tokens(&["a", "other-project", "c"]), &message())
    .await;
    assert_eq!(
        summary,
        DispatchSummary {
            attempted: 3,
            succeeded: 2,
            failed: 1
        }
    );
}

#[tokio::test]
async fn should_fail_batch_when_project_permission_is_denied() {
    let (base_url, _fake) = spawn_fake_fcm().await;

    let result = client(&base_url, ACCESS_TOKEN)
        .send_batch(&tokens(&["t1", "forbidden"]), &message())
        .await;

    assert!(
        matches!(result, Err(PushError::Rejected(403))),
        "expected Rejected(403), got {result:?}"
    );
}

#[tokio::test]
async fn should_mark_tokens_failed_when_provider_is_unreachable() {
    // Bind then drop to get a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let outcomes = client(&format!("http://{addr}"), ACCESS_TOKEN)
        .send_batch(&tokens(&["t1"]), &message())
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].success);
    assert!(outcomes[0].error_message.is_some());
}
