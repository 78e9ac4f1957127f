//! Repository Module
//!
//! CRUD over the embedded SQLite store. Repositories are free functions
//! taking `&SqlitePool` (or a generic executor when they participate in a
//! transaction). Date→millis conversion happens in the service layer;
//! repositories only see primitive columns.

pub mod customer_order;
pub mod dining_table;
pub mod reservation;
pub mod status_history;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err
            && db.kind() == sqlx::error::ErrorKind::UniqueViolation
        {
            return RepoError::Duplicate(db.message().to_string());
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
