//! Shared utilities and common types for the check-in backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Input normalization (trimming, blank handling)
//! - Common validation logic

pub mod validation;
