//! In-memory implementation of the MembershipStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use coffer_core::{BucketId, GroupId, GroupRecord, Tombstone};

use crate::error::{Result, StoreError};
use crate::filter::{matches_all, Filter};
use crate::traits::MembershipStore;

/// In-memory membership store.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<HashMap<BucketId, BucketState>>,
}

#[derive(Default)]
struct BucketState {
    /// Live records by id.
    live: BTreeMap<GroupId, GroupRecord>,

    /// Tombstones of deleted records.
    tombstones: BTreeMap<GroupId, Tombstone>,

    /// Highest timestamp handed out in this bucket.
    last_timestamp: u64,
}

impl BucketState {
    /// Next strictly-increasing timestamp for this bucket.
    fn next_timestamp(&mut self) -> u64 {
        let ts = now_millis().max(self.last_timestamp + 1);
        self.last_timestamp = ts;
        ts
    }
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MembershipStore for MemoryStore {
    async fn get(&self, bucket: &BucketId, id: &GroupId) -> Result<Option<GroupRecord>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .get(bucket)
            .and_then(|state| state.live.get(id))
            .cloned())
    }

    async fn list(&self, bucket: &BucketId, filters: &[Filter]) -> Result<Vec<GroupRecord>> {
        let inner = self.inner.read().unwrap();
        let records = inner
            .get(bucket)
            .map(|state| {
                state
                    .live
                    .values()
                    .filter(|r| matches_all(filters, r))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(records)
    }

    async fn put(&self, bucket: &BucketId, mut record: GroupRecord) -> Result<GroupRecord> {
        record.validate()?;

        let mut inner = self.inner.write().unwrap();
        let state = inner.entry(bucket.clone()).or_default();

        record.last_modified = state.next_timestamp();
        state.tombstones.remove(&record.id);
        state.live.insert(record.id.clone(), record.clone());

        Ok(record)
    }

    async fn delete(&self, bucket: &BucketId, id: &GroupId) -> Result<Tombstone> {
        let mut inner = self.inner.write().unwrap();
        let state = inner
            .get_mut(bucket)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let record = state
            .live
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let tombstone = Tombstone {
            id: record.id,
            last_modified: state.next_timestamp(),
        };
        state
            .tombstones
            .insert(tombstone.id.clone(), tombstone.clone());

        Ok(tombstone)
    }

    async fn delete_many(&self, bucket: &BucketId, filters: &[Filter]) -> Result<Vec<Tombstone>> {
        let mut inner = self.inner.write().unwrap();
        let Some(state) = inner.get_mut(bucket) else {
            return Ok(Vec::new());
        };

        let matching: Vec<GroupId> = state
            .live
            .values()
            .filter(|r| matches_all(filters, r))
            .map(|r| r.id.clone())
            .collect();

        // One logical delete operation: all tombstones share a timestamp.
        let ts = state.next_timestamp();
        let mut tombstones = Vec::with_capacity(matching.len());
        for id in matching {
            state.live.remove(&id);
            let tombstone = Tombstone {
                id: id.clone(),
                last_modified: ts,
            };
            state.tombstones.insert(id, tombstone.clone());
            tombstones.push(tombstone);
        }

        Ok(tombstones)
    }
}

/// Get current time in milliseconds.
fn now_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as u64
}
