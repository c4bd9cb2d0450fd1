//! Domain services for guest check-ins.
//!
//! Services contain business logic that operates on domain models.

pub mod lock_access;

pub use lock_access::{is_disclosable, revealed_code, RevealedCode, NOT_AVAILABLE};
