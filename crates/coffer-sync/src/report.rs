//! Outcome accounting for applied batches.

use coffer_core::{GroupId, Principal};

use crate::error::SyncError;

/// One failed grant or revoke within a batch.
///
/// The index write already committed for earlier pairs; nothing is
/// rolled back. Reapplying the same batch is safe.
#[derive(Debug)]
pub struct GrantFailure {
    /// The group whose entry produced the failure.
    pub group: GroupId,
    /// The principal whose grant or revoke failed.
    pub principal: Principal,
    /// The underlying error.
    pub error: SyncError,
}

/// Result of applying a change batch or cascade to the index.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Number of grants applied.
    pub granted: usize,
    /// Number of revocations applied.
    pub revoked: usize,
    /// Number of entries whose delta was empty.
    pub unchanged: usize,
    /// Grants and revocations that failed.
    pub failures: Vec<GrantFailure>,
}

impl SyncReport {
    /// True when every grant and revoke applied.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: SyncReport) {
        self.granted += other.granted;
        self.revoked += other.revoked;
        self.unchanged += other.unchanged;
        self.failures.extend(other.failures);
    }
}
