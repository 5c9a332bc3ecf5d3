//! Error types for the store module.

use coffer_core::GroupId;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Member-list serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// No live record under the requested id.
    #[error("group not found: {0}")]
    NotFound(GroupId),

    /// Record violates the storage contract.
    #[error("invalid record: {0}")]
    InvalidRecord(#[from] coffer_core::CoreError),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Backend plumbing failure (poisoned lock, blocked task).
    #[error("storage backend error: {0}")]
    Backend(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
