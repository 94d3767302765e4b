use classnote_domain::id::{AssignmentId, ClassId};
use classnote_domain::pagination::{PageMeta, PageRequest};

use crate::domain::repository::AssignmentRepository;
use crate::domain::types::Assignment;
use crate::error::ReportsServiceError;

// ── GetClassAssignments ──────────────────────────────────────────────────────

pub struct AssignmentPage {
    pub items: Vec<Assignment>,
    pub meta: PageMeta,
}

pub struct GetClassAssignmentsUseCase<R: AssignmentRepository> {
    pub repo: R,
}

impl<R: AssignmentRepository> GetClassAssignmentsUseCase<R> {
    pub async fn execute(
        &self,
        class_id: ClassId,
        page: PageRequest,
    ) -> Result<AssignmentPage, ReportsServiceError> {
        if self.repo.find_class(class_id).await?.is_none() {
            return Err(ReportsServiceError::ClassNotFound);
        }
        let page = page.clamped();
        let (items, total) = self.repo.list_by_class(class_id, page).await?;
        Ok(AssignmentPage {
            items,
            meta: PageMeta::new(page, total),
        })
    }
}

// ── GetAssignment ────────────────────────────────────────────────────────────

pub struct GetAssignmentUseCase<R: AssignmentRepository> {
    pub repo: R,
}

impl<R: AssignmentRepository> GetAssignmentUseCase<R> {
    pub async fn execute(&self, id: AssignmentId) -> Result<Assignment, ReportsServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ReportsServiceError::AssignmentNotFound)
    }
}
