use sea_orm_migration::prelude::*;

mod m20250401_000001_create_users;
mod m20250401_000002_create_courses;
mod m20250401_000003_create_classes;
mod m20250401_000004_create_assignments;
mod m20250401_000005_create_class_notifiers;
mod m20250401_000006_create_user_devices;
mod m20250401_000007_create_notification_reports;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250401_000001_create_users::Migration),
            Box::new(m20250401_000002_create_courses::Migration),
            Box::new(m20250401_000003_create_classes::Migration),
            Box::new(m20250401_000004_create_assignments::Migration),
            Box::new(m20250401_000005_create_class_notifiers::Migration),
            Box::new(m20250401_000006_create_user_devices::Migration),
            Box::new(m20250401_000007_create_notification_reports::Migration),
        ]
    }
}
