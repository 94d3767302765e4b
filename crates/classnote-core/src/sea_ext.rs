use sea_orm::{DbErr, SqlErr};

/// `true` when `err` was raised by a unique index or primary key.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
