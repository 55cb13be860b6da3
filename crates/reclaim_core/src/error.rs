//! Request-facing error taxonomy.

use reclaim_db::DbError;
use thiserror::Error;

/// Service operation result type.
pub type Result<T> = std::result::Result<T, CoreError>;

/// The error taxonomy every boundary failure maps into.
///
/// Store failures are classified here, never leaked raw: a uniqueness
/// violation becomes `Conflict`, a missing row `NotFound`, a timed-out
/// call `Unavailable`, and anything else `Internal` (message logged
/// server-side, withheld from clients outside dev mode).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or missing input; lists the offending fields
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// No credential presented
    #[error("authentication required")]
    Unauthorized,

    /// Credential present but invalid, expired, or insufficient
    #[error("forbidden")]
    Forbidden,

    /// Referenced entity absent
    #[error("not found: {0}")]
    NotFound(String),

    /// Uniqueness violation or unknown transition target
    #[error("conflict: {0}")]
    Conflict(String),

    /// Store call exceeded its bounded wait; retryable
    #[error("service unavailable")]
    Unavailable,

    /// Unexpected failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Validation error for a single offending field.
    pub fn invalid_field(field: impl Into<String>) -> Self {
        Self::Validation(vec![field.into()])
    }
}

impl From<DbError> for CoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(msg) => Self::NotFound(msg),
            DbError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}
