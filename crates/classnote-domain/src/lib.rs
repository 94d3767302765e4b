//! Domain types shared across all Classnote services.
//!
//! Pure types with no framework dependencies.

pub mod assignment;
pub mod id;
pub mod pagination;
