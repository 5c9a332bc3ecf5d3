//! The delete interceptor: read, delete, then cascade.
//!
//! Deletion destroys the member list - the store keeps only a
//! tombstone. The interceptor therefore reads full records first and
//! hands those pre-read records to the cascade revoker; its input to
//! the cascade is always a [`GroupRecord`], never a tombstone. This
//! ordering is the central constraint of the whole subsystem.

use std::sync::Arc;

use coffer_core::{BucketId, GroupId, Tombstone};
use coffer_perms::PermissionIndex;
use coffer_store::{Filter, MembershipStore};

use crate::cascade::CascadeRevoker;
use crate::error::{Result, SyncError};
use crate::report::SyncReport;

/// Wraps store deletions with cascading revocation.
pub struct DeleteInterceptor<S: MembershipStore, I: PermissionIndex> {
    store: Arc<S>,
    revoker: CascadeRevoker<I>,
}

impl<S: MembershipStore, I: PermissionIndex> DeleteInterceptor<S, I> {
    /// Create an interceptor over the given store and index.
    pub fn new(store: Arc<S>, index: Arc<I>) -> Self {
        Self {
            store,
            revoker: CascadeRevoker::new(index),
        }
    }

    /// Delete a single group and revoke its members' grants.
    ///
    /// Fails with [`SyncError::NotFound`] if there is no live record;
    /// no cascade runs in that case. The returned report carries any
    /// per-grant revocation failures (the delete itself committed).
    pub async fn delete_one(
        &self,
        bucket: &BucketId,
        id: &GroupId,
    ) -> Result<(Tombstone, SyncReport)> {
        let record = self
            .store
            .get(bucket, id)
            .await?
            .ok_or_else(|| SyncError::NotFound(id.clone()))?;

        let tombstone = self.store.delete(bucket, id).await?;
        let report = self
            .revoker
            .revoke_groups(bucket, std::slice::from_ref(&record))
            .await;

        Ok((tombstone, report))
    }

    /// Delete every group matching `filters` and revoke their grants.
    ///
    /// No matches deletes nothing and revokes nothing.
    pub async fn delete_filtered(
        &self,
        bucket: &BucketId,
        filters: &[Filter],
    ) -> Result<(Vec<Tombstone>, SyncReport)> {
        let records = self.store.list(bucket, filters).await?;
        let tombstones = self.store.delete_many(bucket, filters).await?;
        let report = self.revoker.revoke_groups(bucket, &records).await;

        Ok((tombstones, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_core::{AuthorityToken, GroupRecord, Principal};
    use coffer_perms::{MemoryIndex, PermissionIndex};
    use coffer_store::MemoryStore;

    fn record(id: &str, members: &[&str]) -> GroupRecord {
        GroupRecord::new(GroupId::new(id), members.iter().map(|m| Principal::new(*m)))
    }

    fn token(group: &str) -> AuthorityToken {
        AuthorityToken::for_group(&BucketId::new("bucket1"), &GroupId::new(group))
    }

    async fn seed(
        store: &MemoryStore,
        index: &MemoryIndex,
        bucket: &BucketId,
        groups: &[GroupRecord],
    ) {
        for group in groups {
            store.put(bucket, group.clone()).await.unwrap();
            let t = group.authority_token(bucket);
            for member in &group.members {
                index.grant(member, &t).await.unwrap();
            }
        }
    }

    #[tokio::test]
    async fn test_delete_one_cascades() {
        let bucket = BucketId::new("bucket1");
        let store = Arc::new(MemoryStore::new());
        let index = Arc::new(MemoryIndex::new());
        seed(&store, &index, &bucket, &[record("g1", &["alice", "bob"])]).await;

        let interceptor = DeleteInterceptor::new(Arc::clone(&store), Arc::clone(&index));
        let (tombstone, report) = interceptor.delete_one(&bucket, &GroupId::new("g1")).await.unwrap();

        assert_eq!(tombstone.id, GroupId::new("g1"));
        assert!(report.is_clean());
        assert!(index.principals_of(&token("g1")).await.unwrap().is_empty());
        assert!(store.get(&bucket, &GroupId::new("g1")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_one_missing_runs_no_cascade() {
        let bucket = BucketId::new("bucket1");
        let store = Arc::new(MemoryStore::new());
        let index = Arc::new(MemoryIndex::new());
        index.grant(&Principal::new("alice"), &token("g1")).await.unwrap();

        let interceptor = DeleteInterceptor::new(Arc::clone(&store), Arc::clone(&index));
        let err = interceptor.delete_one(&bucket, &GroupId::new("g1")).await.unwrap_err();

        assert!(matches!(err, SyncError::NotFound(_)));
        // Whatever was in the index stays untouched.
        assert_eq!(index.tokens_of(&Principal::new("alice")).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_filtered_leaves_unrelated_grants() {
        let bucket = BucketId::new("bucket1");
        let store = Arc::new(MemoryStore::new());
        let index = Arc::new(MemoryIndex::new());
        seed(
            &store,
            &index,
            &bucket,
            &[
                record("team-a", &["x"]),
                record("team-b", &["x", "y"]),
                record("misc", &["x", "y"]),
            ],
        )
        .await;

        let interceptor = DeleteInterceptor::new(Arc::clone(&store), Arc::clone(&index));
        let (tombstones, report) = interceptor
            .delete_filtered(&bucket, &[Filter::IdPrefix("team-".into())])
            .await
            .unwrap();

        assert_eq!(tombstones.len(), 2);
        assert!(report.is_clean());
        assert_eq!(report.revoked, 3);

        let x = index.tokens_of(&Principal::new("x")).await.unwrap();
        let y = index.tokens_of(&Principal::new("y")).await.unwrap();
        assert_eq!(x, [token("misc")].into_iter().collect());
        assert_eq!(y, [token("misc")].into_iter().collect());
    }

    #[tokio::test]
    async fn test_delete_filtered_no_matches() {
        let bucket = BucketId::new("bucket1");
        let store = Arc::new(MemoryStore::new());
        let index = Arc::new(MemoryIndex::new());

        let interceptor = DeleteInterceptor::new(Arc::clone(&store), Arc::clone(&index));
        let (tombstones, report) = interceptor
            .delete_filtered(&bucket, &[Filter::IdPrefix("team-".into())])
            .await
            .unwrap();

        assert!(tombstones.is_empty());
        assert!(report.is_clean());
        assert_eq!(report.revoked, 0);
    }
}
