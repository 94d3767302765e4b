//! Service plumbing shared by Classnote HTTP services.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod sea_ext;
pub mod serde;
pub mod tracing;
