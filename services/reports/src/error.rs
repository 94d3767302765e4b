use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use classnote_core::error::{ServiceError, error_response};

/// Reports service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum ReportsServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no class matches the reported directory")]
    UnknownClass,
    #[error("class not found")]
    ClassNotFound,
    #[error("assignment not found")]
    AssignmentNotFound,
    #[error("assignment was written concurrently")]
    StorageConflict,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError for ReportsServiceError {
    fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::UnknownClass => "UNKNOWN_CLASS",
            Self::ClassNotFound => "CLASS_NOT_FOUND",
            Self::AssignmentNotFound => "ASSIGNMENT_NOT_FOUND",
            Self::StorageConflict => "STORAGE_CONFLICT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::UnknownClass | Self::ClassNotFound | Self::AssignmentNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::StorageConflict => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ReportsServiceError {
    fn into_response(self) -> Response {
        error_response(&self)
    }
}

/// Failure of a whole push batch. Confined to the fan-out phase; never
/// converted into [`ReportsServiceError`].
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("push provider rejected credentials (HTTP {0})")]
    Rejected(u16),
    #[error("push transport failed: {0}")]
    Transport(String),
}
