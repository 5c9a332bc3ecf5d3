//! The change synchronizer: applies membership deltas to the index.
//!
//! Consumes the change batch a completed create/update emitted and
//! brings the permission index in line, one idempotent point operation
//! per changed principal. Entries are independent: a failure inside one
//! never blocks its siblings.

use std::collections::BTreeSet;
use std::sync::Arc;

use coffer_core::{membership_delta, BucketId, ChangeBatch, ChangeEntry};
use coffer_perms::PermissionIndex;

use crate::error::SyncError;
use crate::report::{GrantFailure, SyncReport};

/// Applies change batches to a permission index.
///
/// Holds an explicit reference to the index it mutates; it never
/// touches the membership store. Safe to call with the same batch more
/// than once - redundant delivery produces the same index state.
pub struct ChangeSynchronizer<I: PermissionIndex> {
    index: Arc<I>,
}

impl<I: PermissionIndex> ChangeSynchronizer<I> {
    /// Create a synchronizer writing to `index`.
    pub fn new(index: Arc<I>) -> Self {
        Self { index }
    }

    /// Apply every entry of a batch, collecting per-grant outcomes.
    ///
    /// Entries are processed in batch order but carry no cross-entry
    /// dependency; a failed grant is recorded in the report and the
    /// remaining principals and entries still apply.
    pub async fn apply_batch(&self, batch: &ChangeBatch) -> SyncReport {
        let mut report = SyncReport::default();
        for entry in &batch.entries {
            self.apply_entry(&batch.bucket, entry, &mut report).await;
        }
        report
    }

    async fn apply_entry(
        &self,
        bucket: &BucketId,
        entry: &ChangeEntry,
        report: &mut SyncReport,
    ) {
        let empty = BTreeSet::new();
        let old_members = entry.old.as_ref().map(|r| &r.members).unwrap_or(&empty);
        let delta = membership_delta(old_members, &entry.new.members);

        if delta.is_empty() {
            report.unchanged += 1;
            return;
        }

        let token = entry.new.authority_token(bucket);
        tracing::debug!(
            group = %entry.new.id,
            added = delta.added.len(),
            removed = delta.removed.len(),
            "applying membership delta"
        );

        for principal in &delta.added {
            match self.index.grant(principal, &token).await {
                Ok(()) => report.granted += 1,
                Err(e) => {
                    tracing::warn!(group = %entry.new.id, %principal, error = %e, "grant failed");
                    report.failures.push(GrantFailure {
                        group: entry.new.id.clone(),
                        principal: principal.clone(),
                        error: SyncError::IndexWrite(e),
                    });
                }
            }
        }

        for principal in &delta.removed {
            match self.index.revoke(principal, &token).await {
                Ok(()) => report.revoked += 1,
                Err(e) => {
                    tracing::warn!(group = %entry.new.id, %principal, error = %e, "revoke failed");
                    report.failures.push(GrantFailure {
                        group: entry.new.id.clone(),
                        principal: principal.clone(),
                        error: SyncError::IndexWrite(e),
                    });
                }
            }
        }
    }
}
