use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{request_id::PropagateRequestIdLayer, trace::TraceLayer};

use classnote_core::health::healthz;
use classnote_core::middleware::request_id_layer;

use crate::handlers::{
    assignment::{get_assignment, get_class_assignments},
    health::readyz,
    notification_report::create_notification_report,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Reports
        .route("/notification-reports", post(create_notification_report))
        // Assignments
        .route("/classes/{class_id}/assignments", get(get_class_assignments))
        .route("/assignments/{assignment_id}", get(get_assignment))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
