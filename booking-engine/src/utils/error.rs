//! Engine error types
//!
//! One enum for the whole engine surface. "No suitable table" is NOT an
//! error — the availability resolver returns `Ok(None)` and callers leave
//! the request unbound. Store failures abort the enclosing transaction,
//! so a failed operation never leaves a partial bind or status write.

use std::fmt;

use thiserror::Error;

use crate::db::repository::RepoError;

/// Typed reason an assignment was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    CapacityExceeded,
    LocationMismatch,
    TimeConflict,
    TableInactive,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RejectReason::CapacityExceeded => "capacity_exceeded",
            RejectReason::LocationMismatch => "location_mismatch",
            RejectReason::TimeConflict => "time_conflict",
            RejectReason::TableInactive => "table_inactive",
        };
        f.write_str(s)
    }
}

/// Engine errors
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Assignment rejected: {0}")]
    Rejected(RejectReason),

    #[error("Concurrent update conflict: {0}")]
    Conflict(String),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Storage error: {0}")]
    Store(#[from] RepoError),
}

impl BookingError {
    pub fn validation(msg: impl Into<String>) -> Self {
        BookingError::Validation(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        BookingError::NotFound(resource.into())
    }

    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        BookingError::InvalidTransition(msg.into())
    }

    /// Lost races are retryable; everything else is surfaced as-is
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BookingError::Conflict(_) | BookingError::Rejected(RejectReason::TimeConflict)
        )
    }
}

impl From<validator::ValidationErrors> for BookingError {
    fn from(errors: validator::ValidationErrors) -> Self {
        BookingError::Validation(errors.to_string())
    }
}

/// Result type for engine operations
pub type BookingResult<T> = Result<T, BookingError>;
