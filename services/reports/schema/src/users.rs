use sea_orm::entity::prelude::*;

/// Account row owned by the sign-up flow; referenced here by reports,
/// subscriptions and devices.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub banned: bool,
    pub ban_reason: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_devices::Entity")]
    UserDevices,
    #[sea_orm(has_many = "super::class_notifiers::Entity")]
    ClassNotifiers,
}

impl Related<super::user_devices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserDevices.def()
    }
}

impl Related<super::class_notifiers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassNotifiers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
