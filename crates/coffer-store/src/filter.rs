//! Record filters for list and bulk-delete operations.

use coffer_core::{GroupId, GroupRecord, Principal};
use serde::{Deserialize, Serialize};

/// A predicate over live group records.
///
/// Filters in a slice combine conjunctively: a record matches when every
/// filter accepts it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Filter {
    /// The record id starts with the given prefix.
    IdPrefix(String),

    /// The record id is one of the given ids.
    IdIn(Vec<GroupId>),

    /// The principal is a member of the record.
    HasMember(Principal),
}

impl Filter {
    /// Test a single record against this filter.
    pub fn matches(&self, record: &GroupRecord) -> bool {
        match self {
            Filter::IdPrefix(prefix) => record.id.as_str().starts_with(prefix),
            Filter::IdIn(ids) => ids.contains(&record.id),
            Filter::HasMember(principal) => record.members.contains(principal),
        }
    }
}

/// Test a record against a conjunction of filters.
pub fn matches_all(filters: &[Filter], record: &GroupRecord) -> bool {
    filters.iter().all(|f| f.matches(record))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, members: &[&str]) -> GroupRecord {
        GroupRecord::new(GroupId::new(id), members.iter().map(|m| Principal::new(*m)))
    }

    #[test]
    fn test_id_prefix() {
        let r = record("team-a", &[]);
        assert!(Filter::IdPrefix("team-".into()).matches(&r));
        assert!(!Filter::IdPrefix("squad-".into()).matches(&r));
    }

    #[test]
    fn test_has_member() {
        let r = record("g", &["alice"]);
        assert!(Filter::HasMember(Principal::new("alice")).matches(&r));
        assert!(!Filter::HasMember(Principal::new("bob")).matches(&r));
    }

    #[test]
    fn test_conjunction() {
        let r = record("team-a", &["alice"]);
        let filters = [
            Filter::IdPrefix("team-".into()),
            Filter::HasMember(Principal::new("alice")),
        ];
        assert!(matches_all(&filters, &r));

        let filters = [
            Filter::IdPrefix("team-".into()),
            Filter::HasMember(Principal::new("bob")),
        ];
        assert!(!matches_all(&filters, &r));
    }

    #[test]
    fn test_empty_filters_match_everything() {
        assert!(matches_all(&[], &record("anything", &[])));
    }
}
