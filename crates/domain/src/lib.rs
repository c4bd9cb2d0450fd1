//! Domain layer for the check-in backend.
//!
//! This crate contains:
//! - Domain models (CheckinRecord and its request/response shapes)
//! - Business logic services (lock access gate)

pub mod models;
pub mod services;
