//! Error types for the Coffer facade.

use coffer_core::GroupId;
use coffer_sync::{SyncError, SyncReport};
use thiserror::Error;

/// Errors returned by [`Coffer`](crate::Coffer) operations.
#[derive(Debug, Error)]
pub enum CofferError {
    /// No live group under the requested id.
    #[error("group not found: {0}")]
    NotFound(GroupId),

    /// Membership store operation failed.
    #[error("store error: {0}")]
    Store(#[from] coffer_store::StoreError),

    /// Permission index operation failed.
    #[error("index error: {0}")]
    Index(#[from] coffer_perms::IndexError),

    /// The group write committed but some index writes did not.
    ///
    /// The report lists every failed grant/revoke. Re-running the same
    /// operation reconverges: all index writes are idempotent.
    #[error("synchronization incomplete: {} index write(s) failed", .0.failures.len())]
    Sync(SyncReport),

    /// Could not generate an unused group id.
    #[error("id generation exhausted after {0} attempts")]
    IdGeneration(usize),
}

impl From<SyncError> for CofferError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::NotFound(id) => CofferError::NotFound(id),
            SyncError::Store(e) => CofferError::Store(e),
            SyncError::IndexWrite(e) => CofferError::Index(e),
        }
    }
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, CofferError>;
