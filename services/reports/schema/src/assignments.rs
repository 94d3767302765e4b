use sea_orm::entity::prelude::*;

/// An assignment discovered in an LMS directory.
///
/// `(directory_id, external_assignment_id)` is unique. `status` holds
/// `"opened"` or `"deleted"`; rows are never removed.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub class_id: Uuid,
    pub directory_id: String,
    pub external_assignment_id: String,
    pub open_at: Option<chrono::DateTime<chrono::Utc>>,
    pub due_at: Option<chrono::DateTime<chrono::Utc>>,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(has_many = "super::notification_reports::Entity")]
    NotificationReports,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::notification_reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NotificationReports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
