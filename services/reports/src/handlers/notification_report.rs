use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use classnote_auth_types::identity::IdentityHeaders;
use classnote_domain::assignment::ReportType;
use classnote_domain::id::AssignmentId;

use crate::domain::types::{NotificationReport, RawReport};
use crate::error::ReportsServiceError;
use crate::state::AppState;
use crate::usecase::ingest::IngestReportUseCase;
use crate::usecase::reconcile::ReconcileAssignmentUseCase;

// ── Request / response types ─────────────────────────────────────────────────

/// Ids default to empty so a missing field is reported by validation.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationReportRequest {
    #[serde(default)]
    pub directory_id: String,
    #[serde(default)]
    pub assignment_id: String,
    #[serde(default)]
    pub report_type: String,
    pub open_at: Option<String>,
    pub due_at: Option<String>,
}

impl From<CreateNotificationReportRequest> for RawReport {
    fn from(body: CreateNotificationReportRequest) -> Self {
        Self {
            directory_id: body.directory_id,
            assignment_id: body.assignment_id,
            report_type: body.report_type,
            open_at: body.open_at,
            due_at: body.due_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationReportResponse {
    pub id: Uuid,
    pub assignment_id: AssignmentId,
    pub report_type: ReportType,
    #[serde(serialize_with = "classnote_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<NotificationReport> for NotificationReportResponse {
    fn from(report: NotificationReport) -> Self {
        Self {
            id: report.id,
            assignment_id: report.assignment_id,
            report_type: report.report_type,
            created_at: report.created_at,
        }
    }
}

// ── POST /notification-reports ───────────────────────────────────────────────

pub async fn create_notification_report(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    body: Result<Json<CreateNotificationReportRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NotificationReportResponse>), ReportsServiceError> {
    let Json(body) = body.map_err(|e| ReportsServiceError::InvalidInput(e.body_text()))?;

    let usecase = IngestReportUseCase {
        reconciler: ReconcileAssignmentUseCase {
            uow: state.unit_of_work(),
        },
        events: state.event_publisher(),
    };
    let report = usecase.execute(identity.user_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(report.into())))
}
