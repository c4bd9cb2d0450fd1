//! Lock access gate.
//!
//! Decides whether a stored door-lock code may be shown to a guest. A code
//! can exist ("staged" by staff) long before it may be shown; only the
//! combination of a present code and the visibility flag discloses it.

use std::fmt;

use crate::models::CheckinRecord;

/// Text shown in place of a code that may not be disclosed.
pub const NOT_AVAILABLE: &str = "not available";

/// Outcome of a disclosure decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealedCode<'a> {
    /// The stored code, cleared for the guest.
    Code(&'a str),
    /// No code, or a code that is not yet visible.
    NotAvailable,
}

impl<'a> RevealedCode<'a> {
    /// The disclosed code, if any.
    pub fn code(&self) -> Option<&'a str> {
        match self {
            Self::Code(code) => Some(code),
            Self::NotAvailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Code(_))
    }
}

impl fmt::Display for RevealedCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => f.write_str(code),
            Self::NotAvailable => f.write_str(NOT_AVAILABLE),
        }
    }
}

/// Returns true iff a code is present and marked visible.
pub fn is_disclosable(record: &CheckinRecord) -> bool {
    record.lock_visible && record.lock_code.is_some()
}

/// Returns the code when disclosable, otherwise [`RevealedCode::NotAvailable`].
pub fn revealed_code(record: &CheckinRecord) -> RevealedCode<'_> {
    match record.lock_code.as_deref() {
        Some(code) if record.lock_visible => RevealedCode::Code(code),
        _ => RevealedCode::NotAvailable,
    }
}
