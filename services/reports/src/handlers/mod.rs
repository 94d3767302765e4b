pub mod assignment;
pub mod health;
pub mod notification_report;
