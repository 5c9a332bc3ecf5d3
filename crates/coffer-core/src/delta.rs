//! Membership delta computation.
//!
//! The delta between two versions of a group's member set is the minimal
//! pair of grant/revoke sets that brings the permission index in line.
//! The computation is pure and total for any two finite sets.

use std::collections::BTreeSet;

use crate::types::Principal;

/// The minimal change between two member sets.
///
/// `added` and `removed` are disjoint by construction: a principal in
/// both versions appears in neither set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MembershipDelta {
    /// Principals present in the new set but not the old.
    pub added: BTreeSet<Principal>,

    /// Principals present in the old set but not the new.
    pub removed: BTreeSet<Principal>,
}

impl MembershipDelta {
    /// True when the two versions have identical membership.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compute the delta from `old` to `new`.
///
/// Creation is the special case `old = ∅`: every member is an addition.
pub fn membership_delta(
    old: &BTreeSet<Principal>,
    new: &BTreeSet<Principal>,
) -> MembershipDelta {
    MembershipDelta {
        added: new.difference(old).cloned().collect(),
        removed: old.difference(new).cloned().collect(),
    }
}
