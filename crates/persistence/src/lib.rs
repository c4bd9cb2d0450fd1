//! Persistence layer for the check-in backend.
//!
//! This crate contains:
//! - Database connection management
//! - Forward-only schema management
//! - Entity definitions (database row mappings)
//! - Repository implementations

pub mod db;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod repositories;
pub mod schema;

pub use error::StoreError;
pub use schema::{MigrationError, SchemaManager};
