use classnote_domain::id::UserId;

use crate::domain::repository::{EventPublisher, UnitOfWork};
use crate::domain::types::{AssignmentChanged, NotificationReport, RawReport};
use crate::error::ReportsServiceError;
use crate::usecase::normalize::normalize;
use crate::usecase::reconcile::ReconcileAssignmentUseCase;

// ── IngestReport ─────────────────────────────────────────────────────────────

/// Entry point for a report submitted by a user's browser extension.
///
/// Validation and reconciliation decide the response. Fan-out is handed off
/// after commit, so push failures never reach the reporter.
pub struct IngestReportUseCase<U: UnitOfWork, E: EventPublisher> {
    pub reconciler: ReconcileAssignmentUseCase<U>,
    pub events: E,
}

impl<U: UnitOfWork, E: EventPublisher> IngestReportUseCase<U, E> {
    pub async fn execute(
        &self,
        reporter: UserId,
        raw: RawReport,
    ) -> Result<NotificationReport, ReportsServiceError> {
        let report = normalize(raw)?;
        let reconciled = self.reconciler.execute(reporter, &report).await?;

        tracing::info!(
            reporter = %reporter,
            assignment_id = %reconciled.assignment.id,
            class_id = %reconciled.class.id,
            report_type = %report.report_type,
            status = %reconciled.assignment.status,
            "report ingested"
        );

        self.events
            .publish(AssignmentChanged::from(&reconciled))
            .await;

        Ok(reconciled.report)
    }
}
