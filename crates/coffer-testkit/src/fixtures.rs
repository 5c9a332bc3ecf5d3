//! Test fixtures and helpers.
//!
//! Common setup code for integration tests, plus the [`GuardStore`]
//! double that enforces read-before-delete ordering.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use coffer::{Coffer, CofferConfig};
use coffer_core::{BucketId, GroupId, GroupRecord, Principal, Tombstone};
use coffer_perms::MemoryIndex;
use coffer_store::{Filter, MembershipStore, MemoryStore, Result as StoreResult};

/// A test fixture with a prewired in-memory Coffer.
pub struct TestFixture {
    pub coffer: Coffer<MemoryStore, MemoryIndex>,
    pub bucket: BucketId,
}

impl TestFixture {
    /// Create a fixture over fresh in-memory backends.
    pub fn new() -> Self {
        Self {
            coffer: Coffer::new(
                MemoryStore::new(),
                MemoryIndex::new(),
                CofferConfig::default(),
            ),
            bucket: BucketId::new("bucket1"),
        }
    }

    /// Write a group into the fixture bucket.
    pub async fn seed_group(&self, id: &str, members: &[&str]) -> GroupRecord {
        self.coffer
            .put_group(
                &self.bucket,
                GroupId::new(id),
                members.iter().map(|m| Principal::new(*m)),
            )
            .await
            .expect("seeding group")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a record without going through a store.
pub fn record(id: &str, members: &[&str]) -> GroupRecord {
    GroupRecord::new(GroupId::new(id), members.iter().map(|m| Principal::new(*m)))
}

/// A membership store that panics if a deleted record is read again.
///
/// Wraps a [`MemoryStore`] and remembers every id it has tombstoned.
/// Requesting such a record's members afterwards is exactly the bug
/// the delete interceptor exists to prevent, so the double turns it
/// into an immediate test failure instead of a silent empty cascade.
pub struct GuardStore {
    inner: MemoryStore,
    deleted: RwLock<HashSet<(BucketId, GroupId)>>,
}

impl GuardStore {
    /// Create an empty guard store.
    pub fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            deleted: RwLock::new(HashSet::new()),
        }
    }

    /// Wrap in an Arc, the form the interceptor takes.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn assert_not_deleted(&self, bucket: &BucketId, id: &GroupId) {
        let deleted = self.deleted.read().unwrap();
        if deleted.contains(&(bucket.clone(), id.clone())) {
            panic!("members of {}/{} requested after deletion", bucket, id);
        }
    }

    fn mark_deleted(&self, bucket: &BucketId, id: &GroupId) {
        self.deleted
            .write()
            .unwrap()
            .insert((bucket.clone(), id.clone()));
    }
}

impl Default for GuardStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MembershipStore for GuardStore {
    async fn get(&self, bucket: &BucketId, id: &GroupId) -> StoreResult<Option<GroupRecord>> {
        self.assert_not_deleted(bucket, id);
        self.inner.get(bucket, id).await
    }

    async fn list(&self, bucket: &BucketId, filters: &[Filter]) -> StoreResult<Vec<GroupRecord>> {
        self.inner.list(bucket, filters).await
    }

    async fn put(&self, bucket: &BucketId, record: GroupRecord) -> StoreResult<GroupRecord> {
        self.deleted
            .write()
            .unwrap()
            .remove(&(bucket.clone(), record.id.clone()));
        self.inner.put(bucket, record).await
    }

    async fn delete(&self, bucket: &BucketId, id: &GroupId) -> StoreResult<Tombstone> {
        let tombstone = self.inner.delete(bucket, id).await?;
        self.mark_deleted(bucket, id);
        Ok(tombstone)
    }

    async fn delete_many(
        &self,
        bucket: &BucketId,
        filters: &[Filter],
    ) -> StoreResult<Vec<Tombstone>> {
        let tombstones = self.inner.delete_many(bucket, filters).await?;
        for tombstone in &tombstones {
            self.mark_deleted(bucket, &tombstone.id);
        }
        Ok(tombstones)
    }
}
