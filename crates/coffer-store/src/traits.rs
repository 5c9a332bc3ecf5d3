//! Store trait: the abstract interface for group-membership persistence.
//!
//! This trait keeps the synchronization engine storage-agnostic.
//! Implementations include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;
use coffer_core::{BucketId, GroupId, GroupRecord, Tombstone};

use crate::error::Result;
use crate::filter::Filter;

/// The MembershipStore trait: async interface for group persistence.
///
/// All operations are scoped by bucket; a group id is only meaningful
/// within its bucket. Deleting a record retains a [`Tombstone`] in its
/// place — tombstones never expose the member list, so any cascade work
/// that needs members must read the live record first.
///
/// # Design Notes
///
/// - **Full replacement**: `put` replaces the whole record; there is no
///   partial member edit at this layer.
/// - **Tombstone retention**: deleted ids stay visible as tombstones
///   until a later `put` revives them.
/// - **Monotonic timestamps**: `last_modified` strictly increases per
///   bucket across writes and deletes.
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Get a live record by id.
    ///
    /// Returns `Ok(None)` for unknown or deleted ids; a tombstone is not
    /// a `GroupRecord`.
    async fn get(&self, bucket: &BucketId, id: &GroupId) -> Result<Option<GroupRecord>>;

    /// List live records matching all of `filters`.
    ///
    /// An empty filter slice matches every live record in the bucket.
    /// Results are ordered by id.
    async fn list(&self, bucket: &BucketId, filters: &[Filter]) -> Result<Vec<GroupRecord>>;

    /// Create or replace a record, assigning its `last_modified`.
    ///
    /// Returns the stored record. A tombstone under the same id is
    /// cleared.
    async fn put(&self, bucket: &BucketId, record: GroupRecord) -> Result<GroupRecord>;

    /// Delete a live record, retaining a tombstone.
    ///
    /// Fails with [`StoreError::NotFound`](crate::StoreError::NotFound)
    /// if there is no live record under `id`.
    async fn delete(&self, bucket: &BucketId, id: &GroupId) -> Result<Tombstone>;

    /// Delete every live record matching all of `filters`.
    ///
    /// Returns the tombstones, ordered by id. No matches is not an
    /// error: the result is simply empty.
    async fn delete_many(&self, bucket: &BucketId, filters: &[Filter]) -> Result<Vec<Tombstone>>;
}
