use sea_orm::DatabaseConnection;
use tokio::sync::mpsc;

use crate::domain::types::AssignmentChanged;
use crate::infra::db::{DbAssignmentRepository, DbUnitOfWork};
use crate::infra::events::ChannelPublisher;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// Sending half of the fan-out channel.
    pub events: mpsc::Sender<AssignmentChanged>,
}

impl AppState {
    pub fn unit_of_work(&self) -> DbUnitOfWork {
        DbUnitOfWork {
            db: self.db.clone(),
        }
    }

    pub fn assignment_repo(&self) -> DbAssignmentRepository {
        DbAssignmentRepository {
            db: self.db.clone(),
        }
    }

    pub fn event_publisher(&self) -> ChannelPublisher {
        ChannelPublisher {
            sender: self.events.clone(),
        }
    }
}
