//! Test utilities for Classnote services.
//!
//! Provides `MockAuth` identity headers and the contract fixture loader.
//! Import from `[dev-dependencies]` only.

pub mod auth;
pub mod fixture;
