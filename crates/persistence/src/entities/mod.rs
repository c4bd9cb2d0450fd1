//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod checkin;

pub use checkin::CheckinEntity;
