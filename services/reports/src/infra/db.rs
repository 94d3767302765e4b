use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, EntityTrait, FromQueryResult, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Statement, TransactionTrait, sea_query::NullOrdering,
};
use uuid::Uuid;

use classnote_core::sea_ext::is_unique_violation;
use classnote_domain::assignment::AssignmentStatus;
use classnote_domain::id::{AssignmentId, ClassId, UserId};
use classnote_domain::pagination::PageRequest;
use classnote_reports_schema::{assignments, classes, courses, notification_reports};

use crate::domain::repository::{
    AssignmentRepository, AssignmentTx, SubscriberResolver, UnitOfWork,
};
use crate::domain::types::{Assignment, Class, Course, NotificationReport, Subscriber};
use crate::error::ReportsServiceError;

// ── Unit of work ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUnitOfWork {
    pub db: DatabaseConnection,
}

impl UnitOfWork for DbUnitOfWork {
    type Tx = DbAssignmentTx;

    async fn begin(&self) -> Result<DbAssignmentTx, ReportsServiceError> {
        let txn = self.db.begin().await.context("begin reconcile transaction")?;
        Ok(DbAssignmentTx { txn })
    }
}

/// Reconciliation transaction. Rolled back by sea-orm when dropped uncommitted.
pub struct DbAssignmentTx {
    txn: DatabaseTransaction,
}

impl AssignmentTx for DbAssignmentTx {
    async fn find_assignment(
        &self,
        directory_id: &str,
        external_assignment_id: &str,
    ) -> Result<Option<Assignment>, ReportsServiceError> {
        let model = assignments::Entity::find()
            .filter(assignments::Column::DirectoryId.eq(directory_id))
            .filter(assignments::Column::ExternalAssignmentId.eq(external_assignment_id))
            .lock_exclusive()
            .one(&self.txn)
            .await
            .context("find assignment by external id")?;
        Ok(model.map(assignment_from_model).transpose()?)
    }

    async fn find_class_by_external_id(
        &self,
        external_class_id: &str,
    ) -> Result<Option<Class>, ReportsServiceError> {
        // Term strings do not sort chronologically in SQL, so pick in Rust.
        let models = classes::Entity::find()
            .filter(classes::Column::ExternalClassId.eq(external_class_id))
            .all(&self.txn)
            .await
            .context("find classes by external id")?;
        Ok(Class::latest(models.into_iter().map(class_from_model)))
    }

    async fn find_class(&self, id: ClassId) -> Result<Option<Class>, ReportsServiceError> {
        let model = classes::Entity::find_by_id(id.0)
            .one(&self.txn)
            .await
            .context("find class by id")?;
        Ok(model.map(class_from_model))
    }

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>, ReportsServiceError> {
        let model = courses::Entity::find_by_id(id)
            .one(&self.txn)
            .await
            .context("find course by id")?;
        Ok(model.map(course_from_model))
    }

    async fn insert_assignment(&self, assignment: &Assignment) -> Result<(), ReportsServiceError> {
        // Savepoint, so a unique violation leaves the outer transaction usable.
        let savepoint = self.txn.begin().await.context("open insert savepoint")?;
        match assignment_active_model(assignment).insert(&savepoint).await {
            Ok(_) => {
                savepoint.commit().await.context("release insert savepoint")?;
                Ok(())
            }
            Err(e) if is_unique_violation(&e) => {
                savepoint
                    .rollback()
                    .await
                    .context("roll back insert savepoint")?;
                Err(ReportsServiceError::StorageConflict)
            }
            Err(e) => Err(anyhow::Error::new(e).context("insert assignment").into()),
        }
    }

    async fn update_assignment(&self, assignment: &Assignment) -> Result<(), ReportsServiceError> {
        assignment_active_model(assignment)
            .update(&self.txn)
            .await
            .context("update assignment")?;
        Ok(())
    }

    async fn insert_report(&self, report: &NotificationReport) -> Result<(), ReportsServiceError> {
        notification_reports::ActiveModel {
            id: Set(report.id),
            user_id: Set(report.user_id.0),
            assignment_id: Set(report.assignment_id.0),
            report_type: Set(report.report_type.as_str().to_owned()),
            created_at: Set(report.created_at),
        }
        .insert(&self.txn)
        .await
        .context("insert notification report")?;
        Ok(())
    }

    async fn commit(self) -> Result<(), ReportsServiceError> {
        self.txn
            .commit()
            .await
            .context("commit reconcile transaction")?;
        Ok(())
    }
}

// ── Subscriber resolver ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSubscriberResolver {
    pub db: DatabaseConnection,
}

impl SubscriberResolver for DbSubscriberResolver {
    async fn resolve(&self, class_id: ClassId) -> Result<Vec<Subscriber>, ReportsServiceError> {
        #[derive(Debug, FromQueryResult)]
        struct SubscriberRow {
            user_id: Uuid,
            fcm_token: String,
            device_os: String,
        }

        let sql = r#"
            SELECT n.user_id, d.fcm_token, d.device_os
              FROM class_notifiers AS n
              JOIN user_devices AS d ON d.user_id = n.user_id
             WHERE n.class_id = $1
             ORDER BY n.created_at, d.created_at
        "#;

        let rows = SubscriberRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [class_id.0.into()],
        ))
        .all(&self.db)
        .await
        .context("resolve class subscribers")?;

        Ok(rows
            .into_iter()
            .map(|row| Subscriber {
                user_id: UserId(row.user_id),
                fcm_token: row.fcm_token,
                device_os: row.device_os,
            })
            .collect())
    }
}

// ── Assignment repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAssignmentRepository {
    pub db: DatabaseConnection,
}

impl AssignmentRepository for DbAssignmentRepository {
    async fn find_class(&self, id: ClassId) -> Result<Option<Class>, ReportsServiceError> {
        let model = classes::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find class by id")?;
        Ok(model.map(class_from_model))
    }

    async fn list_by_class(
        &self,
        class_id: ClassId,
        page: PageRequest,
    ) -> Result<(Vec<Assignment>, u64), ReportsServiceError> {
        let query =
            assignments::Entity::find().filter(assignments::Column::ClassId.eq(class_id.0));

        let total = query
            .clone()
            .count(&self.db)
            .await
            .context("count class assignments")?;

        let models = query
            .order_by_with_nulls(assignments::Column::DueAt, Order::Asc, NullOrdering::Last)
            .order_by_asc(assignments::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.per_page))
            .all(&self.db)
            .await
            .context("list class assignments")?;

        let items = models
            .into_iter()
            .map(assignment_from_model)
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn find_by_id(
        &self,
        id: AssignmentId,
    ) -> Result<Option<Assignment>, ReportsServiceError> {
        let model = assignments::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find assignment by id")?;
        Ok(model.map(assignment_from_model).transpose()?)
    }
}

// ── Model conversions ────────────────────────────────────────────────────────

fn assignment_from_model(model: assignments::Model) -> anyhow::Result<Assignment> {
    let status = model
        .status
        .parse::<AssignmentStatus>()
        .with_context(|| format!("assignment {} has unreadable status", model.id))?;
    Ok(Assignment {
        id: AssignmentId(model.id),
        class_id: ClassId(model.class_id),
        directory_id: model.directory_id,
        external_assignment_id: model.external_assignment_id,
        open_at: model.open_at,
        due_at: model.due_at,
        status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

fn assignment_active_model(assignment: &Assignment) -> assignments::ActiveModel {
    assignments::ActiveModel {
        id: Set(assignment.id.0),
        class_id: Set(assignment.class_id.0),
        directory_id: Set(assignment.directory_id.clone()),
        external_assignment_id: Set(assignment.external_assignment_id.clone()),
        open_at: Set(assignment.open_at),
        due_at: Set(assignment.due_at),
        status: Set(assignment.status.as_str().to_owned()),
        created_at: Set(assignment.created_at),
        updated_at: Set(assignment.updated_at),
    }
}

fn class_from_model(model: classes::Model) -> Class {
    Class {
        id: ClassId(model.id),
        term: model.term,
        external_class_id: model.external_class_id,
        course_id: model.course_id,
    }
}

fn course_from_model(model: courses::Model) -> Course {
    Course {
        id: model.id,
        title: model.title,
        lead_instructor: model.lead_instructor,
    }
}
