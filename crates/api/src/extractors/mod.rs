//! Custom Axum extractors.
//!
//! Body and query extractors whose rejections render as [`ApiError`]s.
//!
//! [`ApiError`]: crate::error::ApiError

pub mod payload;

pub use payload::{AppJson, AppQuery};
