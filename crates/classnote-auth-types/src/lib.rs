//! Auth types shared across Classnote services.
//!
//! Token verification happens at the gateway; services only see the
//! identity headers it injects.

pub mod identity;
