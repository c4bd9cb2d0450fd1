//! Error types for check-in store operations.

use domain::models::CheckinValidationError;

/// Failure of a check-in store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The submission broke a field rule; nothing was written.
    #[error(transparent)]
    Validation(#[from] CheckinValidationError),

    /// No check-in with this id; nothing was changed.
    #[error("check-in {0} not found")]
    NotFound(i64),

    /// The database was unreachable or rejected the statement.
    #[error("persistence failure: {0}")]
    Persistence(#[from] sqlx::Error),
}

impl StoreError {
    /// Whether the caller may retry the same operation unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
