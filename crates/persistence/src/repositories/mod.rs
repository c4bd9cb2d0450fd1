//! Repository implementations for database operations.

pub mod checkin;

pub use checkin::CheckinRepository;
