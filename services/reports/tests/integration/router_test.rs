use std::collections::BTreeSet;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{TimeZone, Utc};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use uuid::Uuid;

use classnote_domain::assignment::{AssignmentStatus, ReportType};
use classnote_domain::id::{AssignmentId, ClassId, UserId};
use classnote_reports::domain::types::{Assignment, NotificationReport};
use classnote_reports::handlers::assignment::AssignmentResponse;
use classnote_reports::handlers::notification_report::NotificationReportResponse;
use classnote_reports::router::build_router;
use classnote_reports::state::AppState;
use classnote_testing::auth::MockAuth;
use classnote_testing::fixture::Fixture;

/// Router over a disconnected database: only requests rejected before
/// storage is touched are meaningful here.
fn server() -> TestServer {
    let (events, _receiver) = mpsc::channel(1);
    let state = AppState {
        db: DatabaseConnection::default(),
        events,
    };
    TestServer::new(build_router(state)).unwrap()
}

async fn post_report(
    server: &TestServer,
    auth: Option<&MockAuth>,
    body: Value,
) -> (StatusCode, Value) {
    let mut request = server.post("/notification-reports").json(&body);
    if let Some(auth) = auth {
        for (name, value) in auth.headers() {
            request = request.add_header(name, value);
        }
    }
    let response = request.await;
    let status = response.status_code();
    let body = if response.text().is_empty() {
        Value::Null
    } else {
        response.json::<Value>()
    };
    (status, body)
}

fn keys(value: &Value) -> BTreeSet<String> {
    value
        .as_object()
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default()
}

// ── Identity ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_report_without_identity_headers() {
    let fixture = Fixture::load("contracts/http/reports/create_notification_report.json");
    let (status, _) = post_report(&server(), None, fixture["request"].clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_reject_assignment_reads_without_identity_headers() {
    let server = server();
    let response = server
        .get(&format!("/classes/{}/assignments", Uuid::now_v7()))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    let response = server.get(&format!("/assignments/{}", Uuid::now_v7())).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ── Validation ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_unknown_report_type() {
    let fixture = Fixture::load("contracts/http/reports/create_notification_report.json");
    let mut body = fixture["request"].clone();
    body["reportType"] = json!("renamed");

    let (status, body) = post_report(&server(), Some(&MockAuth::user()), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_INPUT");
    assert!(body["message"].as_str().unwrap().contains("reportType"));
}

#[tokio::test]
async fn should_reject_unparseable_due_date() {
    let body = json!({
        "directoryId": "CS101",
        "assignmentId": "hw01",
        "reportType": "changed",
        "dueAt": "19/04/2025"
    });

    let (status, body) = post_report(&server(), Some(&MockAuth::user()), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_INPUT");
    assert!(body["message"].as_str().unwrap().contains("dueAt"));
}

#[tokio::test]
async fn should_reject_missing_directory_id() {
    let body = json!({ "assignmentId": "hw01", "reportType": "appeared" });

    let (status, body) = post_report(&server(), Some(&MockAuth::user()), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_INPUT");
    assert!(body["message"].as_str().unwrap().contains("directoryId"));
}

#[tokio::test]
async fn should_reject_wrongly_typed_fields_with_error_envelope() {
    let body = json!({ "directoryId": 101, "assignmentId": "hw01", "reportType": "appeared" });

    let (status, body) = post_report(&server(), Some(&MockAuth::user()), body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_INPUT");
}

#[tokio::test]
async fn should_reject_malformed_ids_in_paths() {
    let server = server();
    let auth = MockAuth::user();

    let mut request = server.get("/classes/not-a-uuid/assignments");
    for (name, value) in auth.headers() {
        request = request.add_header(name, value);
    }
    let response = request.await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "INVALID_INPUT");

    let mut request = server.get("/assignments/42");
    for (name, value) in auth.headers() {
        request = request.add_header(name, value);
    }
    request.await.assert_status(StatusCode::BAD_REQUEST);
}

// ── Ambient ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_healthz_with_request_id() {
    let response = server().get("/healthz").await;
    response.assert_status_ok();
    assert!(response.headers().contains_key("x-request-id"));
}

// ── Response contracts ───────────────────────────────────────────────────────

#[test]
fn notification_report_response_should_match_contract() {
    let fixture = Fixture::load("contracts/http/reports/create_notification_report.json");
    let report = NotificationReport {
        id: Uuid::now_v7(),
        user_id: UserId(Uuid::now_v7()),
        assignment_id: AssignmentId(Uuid::now_v7()),
        report_type: ReportType::Appeared,
        created_at: Utc.with_ymd_and_hms(2025, 4, 12, 9, 30, 0).unwrap(),
    };

    let body = serde_json::to_value(NotificationReportResponse::from(report)).unwrap();

    let expected = &fixture["response"]["body"];
    assert_eq!(keys(&body), keys(expected));
    assert_eq!(body["reportType"], expected["reportType"]);
    assert_eq!(body["createdAt"], expected["createdAt"]);
}

#[test]
fn assignment_response_should_match_contract() {
    let fixture = Fixture::load("contracts/http/reports/get_assignment.json");
    let assignment = Assignment {
        id: AssignmentId(Uuid::now_v7()),
        class_id: ClassId(Uuid::now_v7()),
        directory_id: "CS101".to_owned(),
        external_assignment_id: "hw01".to_owned(),
        open_at: None,
        due_at: Some(Utc.with_ymd_and_hms(2025, 4, 19, 14, 59, 0).unwrap()),
        status: AssignmentStatus::Opened,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };

    let body = serde_json::to_value(AssignmentResponse::from(assignment)).unwrap();

    let expected = &fixture["response"]["body"];
    assert_eq!(keys(&body), keys(expected));
    for field in ["directoryId", "assignmentId", "openAt", "dueAt", "status"] {
        assert_eq!(body[field], expected[field], "{field}");
    }
}
