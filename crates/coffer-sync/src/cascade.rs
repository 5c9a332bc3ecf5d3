//! Cascading revocation for deleted groups.
//!
//! Works from records read *before* deletion: a tombstone has no member
//! list, so by the time a group is gone this is the only component that
//! still knows who to revoke.

use std::sync::Arc;

use coffer_core::{BucketId, GroupRecord};
use coffer_perms::PermissionIndex;

use crate::error::SyncError;
use crate::report::{GrantFailure, SyncReport};

/// Revokes every member's grant for each deleted group's token.
pub struct CascadeRevoker<I: PermissionIndex> {
    index: Arc<I>,
}

impl<I: PermissionIndex> CascadeRevoker<I> {
    /// Create a revoker writing to `index`.
    pub fn new(index: Arc<I>) -> Self {
        Self { index }
    }

    /// Revoke all grants for the given pre-deletion records.
    ///
    /// An empty slice is a no-op. Each revocation is idempotent and
    /// failures are per-grant: one failed pair never blocks the rest.
    pub async fn revoke_groups(&self, bucket: &BucketId, groups: &[GroupRecord]) -> SyncReport {
        let mut report = SyncReport::default();

        for group in groups {
            let token = group.authority_token(bucket);
            for member in &group.members {
                match self.index.revoke(member, &token).await {
                    Ok(()) => report.revoked += 1,
                    Err(e) => {
                        tracing::warn!(group = %group.id, principal = %member, error = %e, "cascade revoke failed");
                        report.failures.push(GrantFailure {
                            group: group.id.clone(),
                            principal: member.clone(),
                            error: SyncError::IndexWrite(e),
                        });
                    }
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_core::{AuthorityToken, GroupId, Principal};
    use coffer_perms::MemoryIndex;

    fn record(id: &str, members: &[&str]) -> GroupRecord {
        GroupRecord::new(GroupId::new(id), members.iter().map(|m| Principal::new(*m)))
    }

    #[tokio::test]
    async fn test_cascade_revokes_every_member() {
        let bucket = BucketId::new("bucket1");
        let index = Arc::new(MemoryIndex::new());

        // alice also belongs to another group that is not being deleted.
        let g1_token = AuthorityToken::for_group(&bucket, &GroupId::new("g1"));
        let other_token = AuthorityToken::for_group(&bucket, &GroupId::new("other"));
        for principal in ["alice", "bob", "carol"].map(Principal::new) {
            index.grant(&principal, &g1_token).await.unwrap();
        }
        index.grant(&Principal::new("alice"), &other_token).await.unwrap();

        let revoker = CascadeRevoker::new(Arc::clone(&index));
        let report = revoker
            .revoke_groups(&bucket, &[record("g1", &["alice", "bob", "carol"])])
            .await;

        assert!(report.is_clean());
        assert_eq!(report.revoked, 3);
        assert!(index.principals_of(&g1_token).await.unwrap().is_empty());
        // Unrelated grants stay.
        assert!(index.tokens_of(&Principal::new("alice")).await.unwrap().contains(&other_token));
    }

    #[tokio::test]
    async fn test_empty_sequence_is_noop() {
        let index = Arc::new(MemoryIndex::new());
        let revoker = CascadeRevoker::new(Arc::clone(&index));

        let report = revoker.revoke_groups(&BucketId::new("bucket1"), &[]).await;
        assert!(report.is_clean());
        assert_eq!(report.revoked, 0);
    }
}
