use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON error envelope returned by every Classnote service.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

/// Implemented by service error enums to share one response shape.
pub trait ServiceError: std::error::Error {
    fn kind(&self) -> &'static str;
    fn status(&self) -> StatusCode;
}

/// Render a service error as `(status, {"kind", "message"})`.
///
/// Only 5xx are logged here; `TraceLayer` already records every request.
pub fn error_response<E: ServiceError>(error: &E) -> Response {
    let status = error.status();
    if status.is_server_error() {
        tracing::error!(error = ?error, kind = error.kind(), "internal error");
    }
    let body = ErrorBody {
        kind: error.kind(),
        message: error.to_string(),
    };
    (status, axum::Json(body)).into_response()
}
