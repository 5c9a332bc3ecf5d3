//! Error types for the permission index.

use thiserror::Error;

/// Errors that can occur during index operations.
///
/// A failed grant or revoke is surfaced to the caller and never retried
/// here; point operations are idempotent, so the caller can reapply the
/// whole delta.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Backend plumbing failure (poisoned lock, blocked task).
    #[error("index backend error: {0}")]
    Backend(String),
}

/// Result type for index operations.
pub type Result<T> = std::result::Result<T, IndexError>;
