//! Group records and their deleted representation.
//!
//! A live record carries the full member list. Once deleted, only a
//! [`Tombstone`] remains: the id and a timestamp, never the members.
//! Cascade revocation therefore has to work from records read *before*
//! deletion, and the types here keep that distinction explicit.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{AuthorityToken, BucketId, GroupId, Principal};

/// A live group record: a named set of member principals.
///
/// Members are an unordered set; duplicates collapse on construction.
/// The owning bucket is not part of the record — it is carried by the
/// store scope and the change-notification context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Record identifier, unique within the bucket.
    pub id: GroupId,

    /// Member principals of this group.
    #[serde(default)]
    pub members: BTreeSet<Principal>,

    /// Server-assigned modification timestamp (Unix ms).
    #[serde(default)]
    pub last_modified: u64,
}

impl GroupRecord {
    /// Create a record with the given members. Duplicates collapse.
    pub fn new(id: GroupId, members: impl IntoIterator<Item = Principal>) -> Self {
        Self {
            id,
            members: members.into_iter().collect(),
            last_modified: 0,
        }
    }

    /// Derive the authority token this group grants within `bucket`.
    pub fn authority_token(&self, bucket: &BucketId) -> AuthorityToken {
        AuthorityToken::for_group(bucket, &self.id)
    }

    /// Check the record satisfies the storage contract.
    ///
    /// An empty id is a caller bug, not a recoverable runtime state.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.as_str().is_empty() {
            return Err(CoreError::EmptyIdentifier("group id"));
        }
        Ok(())
    }
}

/// The retained representation of a deleted group record.
///
/// Tombstones deliberately carry no `members` field: the member list is
/// unrecoverable after deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tombstone {
    /// Identifier of the deleted record.
    pub id: GroupId,

    /// Timestamp of the deleting write (Unix ms).
    pub last_modified: u64,
}
