#![allow(async_fn_in_trait)]

use uuid::Uuid;

use classnote_domain::id::{AssignmentId, ClassId};
use classnote_domain::pagination::PageRequest;

use crate::domain::types::{
    Assignment, AssignmentChanged, Class, Course, DeliveryOutcome, NotificationReport,
    PushMessage, Subscriber,
};
use crate::error::{PushError, ReportsServiceError};

/// Opens the transaction that reconciles one report.
pub trait UnitOfWork: Send + Sync {
    type Tx: AssignmentTx;

    async fn begin(&self) -> Result<Self::Tx, ReportsServiceError>;
}

/// Storage operations inside a reconciliation transaction.
///
/// Nothing is visible to other transactions until [`commit`](Self::commit).
/// Dropping the value without committing rolls every write back.
pub trait AssignmentTx: Send {
    async fn find_assignment(
        &self,
        directory_id: &str,
        external_assignment_id: &str,
    ) -> Result<Option<Assignment>, ReportsServiceError>;

    /// Class whose LMS id equals `external_class_id`; the latest term wins.
    async fn find_class_by_external_id(
        &self,
        external_class_id: &str,
    ) -> Result<Option<Class>, ReportsServiceError>;

    async fn find_class(&self, id: ClassId) -> Result<Option<Class>, ReportsServiceError>;

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>, ReportsServiceError>;

    /// Returns `StorageConflict` if the `(directory_id, external_assignment_id)`
    /// pair already exists. The transaction stays usable afterwards.
    async fn insert_assignment(&self, assignment: &Assignment) -> Result<(), ReportsServiceError>;

    async fn update_assignment(&self, assignment: &Assignment) -> Result<(), ReportsServiceError>;

    async fn insert_report(&self, report: &NotificationReport) -> Result<(), ReportsServiceError>;

    async fn commit(self) -> Result<(), ReportsServiceError>;
}

/// Read-only view of class subscriptions and their devices.
pub trait SubscriberResolver: Send + Sync {
    async fn resolve(&self, class_id: ClassId) -> Result<Vec<Subscriber>, ReportsServiceError>;
}

/// Read side for assignments.
pub trait AssignmentRepository: Send + Sync {
    async fn find_class(&self, id: ClassId) -> Result<Option<Class>, ReportsServiceError>;

    /// One page of a class's assignments plus the total row count.
    async fn list_by_class(
        &self,
        class_id: ClassId,
        page: PageRequest,
    ) -> Result<(Vec<Assignment>, u64), ReportsServiceError>;

    async fn find_by_id(&self, id: AssignmentId)
    -> Result<Option<Assignment>, ReportsServiceError>;
}

/// Port to the push-delivery provider.
pub trait PushProvider: Send + Sync {
    /// One outcome per token. `Err` only when the whole batch failed.
    async fn send_batch(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<Vec<DeliveryOutcome>, PushError>;
}

/// Hands committed changes to the fan-out stage.
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: AssignmentChanged);
}
