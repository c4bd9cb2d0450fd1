//! HTTP route handlers.

pub mod checkins;
pub mod health;
