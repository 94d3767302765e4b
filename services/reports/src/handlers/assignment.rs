use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use classnote_auth_types::identity::IdentityHeaders;
use classnote_domain::assignment::AssignmentStatus;
use classnote_domain::id::{AssignmentId, ClassId};
use classnote_domain::pagination::{PageMeta, PageRequest};

use crate::domain::types::Assignment;
use crate::error::ReportsServiceError;
use crate::state::AppState;
use crate::usecase::assignment::{GetAssignmentUseCase, GetClassAssignmentsUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub id: AssignmentId,
    pub class_id: ClassId,
    pub directory_id: String,
    /// The LMS's own id for the assignment.
    pub assignment_id: String,
    #[serde(serialize_with = "classnote_core::serde::to_rfc3339_ms_opt")]
    pub open_at: Option<DateTime<Utc>>,
    #[serde(serialize_with = "classnote_core::serde::to_rfc3339_ms_opt")]
    pub due_at: Option<DateTime<Utc>>,
    pub status: AssignmentStatus,
}

impl From<Assignment> for AssignmentResponse {
    fn from(a: Assignment) -> Self {
        Self {
            id: a.id,
            class_id: a.class_id,
            directory_id: a.directory_id,
            assignment_id: a.external_assignment_id,
            open_at: a.open_at,
            due_at: a.due_at,
            status: a.status,
        }
    }
}

#[derive(Serialize)]
pub struct AssignmentListResponse {
    pub data: Vec<AssignmentResponse>,
    pub meta: PageMeta,
}

// ── GET /classes/{classId}/assignments ───────────────────────────────────────

pub async fn get_class_assignments(
    _identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(class_id): Path<String>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<AssignmentListResponse>, ReportsServiceError> {
    let class_id: ClassId = class_id.parse().map_err(|_| {
        ReportsServiceError::InvalidInput(format!("classId: {class_id:?} is not a UUID"))
    })?;
    let Query(page) = query.map_err(|e| ReportsServiceError::InvalidInput(e.body_text()))?;

    let usecase = GetClassAssignmentsUseCase {
        repo: state.assignment_repo(),
    };
    let page = usecase.execute(class_id, page).await?;
    Ok(Json(AssignmentListResponse {
        data: page.items.into_iter().map(Into::into).collect(),
        meta: page.meta,
    }))
}

// ── GET /assignments/{assignmentId} ──────────────────────────────────────────

pub async fn get_assignment(
    _identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
) -> Result<Json<AssignmentResponse>, ReportsServiceError> {
    let id: AssignmentId = assignment_id.parse().map_err(|_| {
        ReportsServiceError::InvalidInput(format!("assignmentId: {assignment_id:?} is not a UUID"))
    })?;

    let usecase = GetAssignmentUseCase {
        repo: state.assignment_repo(),
    };
    let assignment = usecase.execute(id).await?;
    Ok(Json(assignment.into()))
}
