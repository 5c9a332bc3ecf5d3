//! Change notifications emitted after group writes.
//!
//! Each completed create/update produces a [`ChangeBatch`]: the bucket
//! scope plus one entry per written record, carrying the new version and
//! (for updates) the previous one. Delivery is at-least-once; consumers
//! must tolerate redundant batches, which the synchronizer does because
//! grant/revoke operations are idempotent.

use serde::{Deserialize, Serialize};

use crate::record::GroupRecord;
use crate::types::BucketId;

/// One changed record within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// The previous version, absent for creations.
    pub old: Option<GroupRecord>,

    /// The new version of the record.
    pub new: GroupRecord,
}

impl ChangeEntry {
    /// Entry for a freshly created record.
    pub fn created(new: GroupRecord) -> Self {
        debug_assert!(!new.id.as_str().is_empty(), "change entry without an id");
        Self { old: None, new }
    }

    /// Entry for an updated record, carrying its previous version.
    pub fn updated(old: GroupRecord, new: GroupRecord) -> Self {
        debug_assert!(!new.id.as_str().is_empty(), "change entry without an id");
        debug_assert_eq!(old.id, new.id, "change entry id mismatch");
        Self { old: Some(old), new }
    }
}

/// A batch of change entries from one completed write operation.
///
/// Entries are independent: there is no cross-entry dependency and no
/// required processing order within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeBatch {
    /// The bucket all entries in this batch belong to.
    pub bucket: BucketId,

    /// The changed records.
    pub entries: Vec<ChangeEntry>,
}

impl ChangeBatch {
    /// Create an empty batch for a bucket.
    pub fn new(bucket: BucketId) -> Self {
        Self {
            bucket,
            entries: Vec::new(),
        }
    }

    /// Create a batch with a single entry.
    pub fn single(bucket: BucketId, entry: ChangeEntry) -> Self {
        Self {
            bucket,
            entries: vec![entry],
        }
    }

    /// Append an entry to the batch.
    pub fn push(&mut self, entry: ChangeEntry) {
        self.entries.push(entry);
    }
}
