//! Error types for the synchronization engine.

use coffer_core::GroupId;
use thiserror::Error;

/// Errors that can occur during synchronization.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Single-record delete of an id with no live record.
    #[error("group not found: {0}")]
    NotFound(GroupId),

    /// Membership store operation failed.
    #[error("store error: {0}")]
    Store(#[from] coffer_store::StoreError),

    /// A grant or revoke against the permission index failed.
    ///
    /// Never fatal to sibling entries; carried per grant in the
    /// [`SyncReport`](crate::SyncReport).
    #[error("index write failed: {0}")]
    IndexWrite(#[from] coffer_perms::IndexError),
}

/// Result type for synchronization operations.
pub type Result<T> = std::result::Result<T, SyncError>;
