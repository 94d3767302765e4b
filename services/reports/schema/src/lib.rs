//! sea-orm entities for the reports service.

pub mod assignments;
pub mod class_notifiers;
pub mod classes;
pub mod courses;
pub mod notification_reports;
pub mod user_devices;
pub mod users;
