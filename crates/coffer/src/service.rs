//! The Coffer facade: group writes with a synchronized permission index.
//!
//! Brings together the membership store, the permission index, and the
//! synchronization engine into a cohesive interface. Every write path
//! funnels through here, which is what lets the engine see old state
//! before it is overwritten or destroyed.

use std::collections::BTreeSet;
use std::sync::Arc;

use coffer_core::{
    AuthorityToken, BucketId, ChangeBatch, ChangeEntry, GroupId, GroupRecord, Principal,
    Tombstone,
};
use coffer_perms::PermissionIndex;
use coffer_store::{Filter, MembershipStore};
use coffer_sync::{ChangeSynchronizer, DeleteInterceptor};

use crate::error::{CofferError, Result};
use crate::idgen::generate_id;

/// How many generated ids to try before giving up on a collision-free one.
const ID_ATTEMPTS: usize = 16;

/// Configuration for the Coffer facade.
#[derive(Debug, Clone)]
pub struct CofferConfig {
    /// Length of generated group ids.
    pub id_length: usize,
}

impl Default for CofferConfig {
    fn default() -> Self {
        Self { id_length: 8 }
    }
}

/// The main Coffer struct.
///
/// Provides a unified API for:
/// - Creating, replacing, and reading group records
/// - Deleting groups, singly or by filter, with cascading revocation
/// - Querying the permission index
///
/// Change batches are applied to the index synchronously, inside the
/// same logical operation as the store write. The store and index are
/// injected explicitly; nothing here reaches through ambient state.
pub struct Coffer<S: MembershipStore, I: PermissionIndex> {
    /// The membership store.
    store: Arc<S>,
    /// The permission index.
    index: Arc<I>,
    /// Applies post-write change batches.
    synchronizer: ChangeSynchronizer<I>,
    /// Wraps deletions with read-before-delete cascades.
    interceptor: DeleteInterceptor<S, I>,
    /// Configuration.
    config: CofferConfig,
}

impl<S: MembershipStore, I: PermissionIndex> Coffer<S, I> {
    /// Create a new Coffer over the given store and index.
    pub fn new(store: S, index: I, config: CofferConfig) -> Self {
        let store = Arc::new(store);
        let index = Arc::new(index);
        Self {
            synchronizer: ChangeSynchronizer::new(Arc::clone(&index)),
            interceptor: DeleteInterceptor::new(Arc::clone(&store), Arc::clone(&index)),
            store,
            index,
            config,
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the index reference.
    pub fn index(&self) -> &I {
        &self.index
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Group Write Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a group with a generated id.
    ///
    /// Generated ids are short lowercase-alphanumeric names; generation
    /// retries on the rare collision with an existing live record.
    pub async fn create_group(
        &self,
        bucket: &BucketId,
        members: impl IntoIterator<Item = Principal>,
    ) -> Result<GroupRecord> {
        let members: BTreeSet<Principal> = members.into_iter().collect();

        for _ in 0..ID_ATTEMPTS {
            let id = generate_id(self.config.id_length);
            if self.store.get(bucket, &id).await?.is_none() {
                return self.put_group(bucket, id, members).await;
            }
        }
        Err(CofferError::IdGeneration(ID_ATTEMPTS))
    }

    /// Create or replace a group under a caller-supplied id.
    ///
    /// The whole member set is replaced. The previous version is read
    /// first so the change batch carries it, then the write and its
    /// index synchronization run as one logical operation.
    ///
    /// On [`CofferError::Sync`] the store write has already committed;
    /// repeating the call replays the delta and reconverges.
    pub async fn put_group(
        &self,
        bucket: &BucketId,
        id: GroupId,
        members: impl IntoIterator<Item = Principal>,
    ) -> Result<GroupRecord> {
        let old = self.store.get(bucket, &id).await?;
        let record = GroupRecord::new(id, members);
        let stored = self.store.put(bucket, record).await?;

        let entry = match old {
            Some(old) => ChangeEntry::updated(old, stored.clone()),
            None => ChangeEntry::created(stored.clone()),
        };
        let batch = ChangeBatch::single(bucket.clone(), entry);

        let report = self.synchronizer.apply_batch(&batch).await;
        tracing::debug!(
            bucket = %bucket,
            group = %stored.id,
            granted = report.granted,
            revoked = report.revoked,
            "group written"
        );
        if !report.is_clean() {
            return Err(CofferError::Sync(report));
        }

        Ok(stored)
    }

    /// Delete a group and revoke all of its members' grants.
    pub async fn delete_group(&self, bucket: &BucketId, id: &GroupId) -> Result<Tombstone> {
        let (tombstone, report) = self.interceptor.delete_one(bucket, id).await?;
        if !report.is_clean() {
            return Err(CofferError::Sync(report));
        }
        Ok(tombstone)
    }

    /// Delete every group matching `filters`, revoking as it goes.
    pub async fn delete_groups(
        &self,
        bucket: &BucketId,
        filters: &[Filter],
    ) -> Result<Vec<Tombstone>> {
        let (tombstones, report) = self.interceptor.delete_filtered(bucket, filters).await?;
        if !report.is_clean() {
            return Err(CofferError::Sync(report));
        }
        Ok(tombstones)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a live group by id.
    pub async fn get_group(&self, bucket: &BucketId, id: &GroupId) -> Result<Option<GroupRecord>> {
        Ok(self.store.get(bucket, id).await?)
    }

    /// List live groups matching `filters`.
    pub async fn list_groups(
        &self,
        bucket: &BucketId,
        filters: &[Filter],
    ) -> Result<Vec<GroupRecord>> {
        Ok(self.store.list(bucket, filters).await?)
    }

    /// All authority tokens currently held by a principal.
    pub async fn tokens_of(&self, principal: &Principal) -> Result<BTreeSet<AuthorityToken>> {
        Ok(self.index.tokens_of(principal).await?)
    }

    /// All principals currently holding a group's token.
    pub async fn principals_of(&self, token: &AuthorityToken) -> Result<BTreeSet<Principal>> {
        Ok(self.index.principals_of(token).await?)
    }
}
