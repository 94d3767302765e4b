use anyhow::anyhow;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use classnote_domain::id::UserId;

use crate::domain::repository::{AssignmentTx, UnitOfWork};
use crate::domain::types::{Assignment, Class, NotificationReport, Reconciled, Report};
use crate::error::ReportsServiceError;

// ── ReconcileAssignment ──────────────────────────────────────────────────────

/// Applies a validated report to its assignment and appends the audit row,
/// both in one unit of work.
pub struct ReconcileAssignmentUseCase<U: UnitOfWork> {
    pub uow: U,
}

impl<U: UnitOfWork> ReconcileAssignmentUseCase<U> {
    pub async fn execute(
        &self,
        reporter: UserId,
        report: &Report,
    ) -> Result<Reconciled, ReportsServiceError> {
        let tx = self.uow.begin().await?;
        let now = Utc::now();

        let existing = tx
            .find_assignment(&report.directory_id, &report.external_assignment_id)
            .await?;
        let (assignment, class) = match existing {
            Some(assignment) => update_existing(&tx, assignment, report, now).await?,
            None => create_or_update(&tx, report, now).await?,
        };

        let course = match class.course_id {
            Some(course_id) => tx.find_course(course_id).await?,
            None => None,
        };

        let audit = NotificationReport {
            id: Uuid::now_v7(),
            user_id: reporter,
            assignment_id: assignment.id,
            report_type: report.report_type,
            created_at: now,
        };
        tx.insert_report(&audit).await?;
        tx.commit().await?;

        Ok(Reconciled {
            assignment,
            report: audit,
            class,
            course,
        })
    }
}

/// The pair has not been seen: attribute it to a class and insert it. If a
/// concurrent report inserted the same pair first, fall back to the update
/// path exactly once.
async fn create_or_update<T: AssignmentTx>(
    tx: &T,
    report: &Report,
    now: DateTime<Utc>,
) -> Result<(Assignment, Class), ReportsServiceError> {
    let class = tx
        .find_class_by_external_id(&report.directory_id)
        .await?
        .ok_or(ReportsServiceError::UnknownClass)?;

    let assignment = Assignment::from_report(class.id, report, now);
    match tx.insert_assignment(&assignment).await {
        Ok(()) => Ok((assignment, class)),
        Err(ReportsServiceError::StorageConflict) => {
            tracing::debug!(
                directory_id = %report.directory_id,
                assignment_id = %report.external_assignment_id,
                "assignment inserted concurrently, retrying as update"
            );
            let winner = tx
                .find_assignment(&report.directory_id, &report.external_assignment_id)
                .await?
                .ok_or_else(|| {
                    anyhow!(
                        "assignment {}/{} conflicted on insert but is not readable",
                        report.directory_id,
                        report.external_assignment_id
                    )
                })?;
            update_existing(tx, winner, report, now).await
        }
        Err(e) => Err(e),
    }
}

async fn update_existing<T: AssignmentTx>(
    tx: &T,
    mut assignment: Assignment,
    report: &Report,
    now: DateTime<Utc>,
) -> Result<(Assignment, Class), ReportsServiceError> {
    assignment.apply(report, now);
    tx.update_assignment(&assignment).await?;
    let class = tx.find_class(assignment.class_id).await?.ok_or_else(|| {
        anyhow!(
            "assignment {} references missing class {}",
            assignment.id,
            assignment.class_id
        )
    })?;
    Ok((assignment, class))
}
