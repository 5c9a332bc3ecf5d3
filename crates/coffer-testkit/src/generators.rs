//! Proptest generators for property-based testing.

use std::collections::BTreeSet;

use proptest::prelude::*;

use coffer_core::{BucketId, ChangeBatch, ChangeEntry, GroupId, GroupRecord, Principal};

/// Generate a bucket id.
pub fn bucket_id() -> impl Strategy<Value = BucketId> {
    "[a-z][a-z0-9-]{0,15}".prop_map(BucketId::new)
}

/// Generate a group id.
pub fn group_id() -> impl Strategy<Value = GroupId> {
    "[a-z][a-z0-9_-]{0,15}".prop_map(GroupId::new)
}

/// Generate a principal.
pub fn principal() -> impl Strategy<Value = Principal> {
    "[a-z]{1,8}".prop_map(Principal::new)
}

/// Generate a member set of up to `max` principals.
pub fn member_set(max: usize) -> impl Strategy<Value = BTreeSet<Principal>> {
    prop::collection::btree_set(principal(), 0..=max)
}

/// Generate a group record.
pub fn group_record() -> impl Strategy<Value = GroupRecord> {
    (group_id(), member_set(8)).prop_map(|(id, members)| GroupRecord::new(id, members))
}

/// Generate a change entry: a creation, or an update of the same id.
pub fn change_entry() -> impl Strategy<Value = ChangeEntry> {
    (group_id(), member_set(8), prop::option::of(member_set(8))).prop_map(
        |(id, new_members, old_members)| {
            let new = GroupRecord::new(id.clone(), new_members);
            match old_members {
                Some(old) => ChangeEntry::updated(GroupRecord::new(id, old), new),
                None => ChangeEntry::created(new),
            }
        },
    )
}

/// Generate a change batch of up to `max` entries.
pub fn change_batch(max: usize) -> impl Strategy<Value = ChangeBatch> {
    (bucket_id(), prop::collection::vec(change_entry(), 0..=max))
        .prop_map(|(bucket, entries)| ChangeBatch { bucket, entries })
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn prop_generated_entries_share_ids(entry in change_entry()) {
            if let Some(old) = &entry.old {
                prop_assert_eq!(&old.id, &entry.new.id);
            }
        }

        #[test]
        fn prop_generated_records_validate(record in group_record()) {
            prop_assert!(record.validate().is_ok());
        }
    }
}
