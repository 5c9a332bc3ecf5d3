//! Strong type definitions for Coffer.
//!
//! All identifiers are newtypes to prevent misuse at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a bucket, the parent scope that owns groups.
///
/// Buckets are opaque strings chosen by callers. A group id is only
/// unique within its bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BucketId(String);

impl BucketId {
    /// Create a new BucketId.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BucketId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Identifier of a group record, unique within its bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(String);

impl GroupId {
    /// Create a new GroupId.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// A principal: an identifier for a user or actor that can hold grants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Principal(String);

impl Principal {
    /// Create a new Principal.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// The derived authority key for membership in one specific group.
///
/// Tokens are path-shaped: `/buckets/{bucket}/groups/{group}`. The same
/// group always derives the same token; two distinct groups never share
/// one. Tokens are the unit granted to and revoked from principals in
/// the permission index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AuthorityToken(String);

impl AuthorityToken {
    /// Derive the token for a group within a bucket.
    pub fn for_group(bucket: &BucketId, group: &GroupId) -> Self {
        Self(format!("/buckets/{}/groups/{}", bucket, group))
    }

    /// Parse a token back into its bucket and group identifiers.
    pub fn parse(s: &str) -> Result<(BucketId, GroupId), crate::error::CoreError> {
        let rest = s
            .strip_prefix("/buckets/")
            .ok_or_else(|| crate::error::CoreError::MalformedToken(s.to_owned()))?;
        let (bucket, group) = rest
            .split_once("/groups/")
            .ok_or_else(|| crate::error::CoreError::MalformedToken(s.to_owned()))?;
        if bucket.is_empty() || group.is_empty() || group.contains('/') {
            return Err(crate::error::CoreError::MalformedToken(s.to_owned()));
        }
        Ok((BucketId::new(bucket), GroupId::new(group)))
    }

    /// Reconstruct a token from its stored string form.
    ///
    /// For storage backends reading tokens they previously persisted;
    /// new tokens come from [`AuthorityToken::for_group`].
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Get the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthorityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_derivation_is_stable() {
        let bucket = BucketId::new("bucket1");
        let group = GroupId::new("g1");
        let t1 = AuthorityToken::for_group(&bucket, &group);
        let t2 = AuthorityToken::for_group(&bucket, &group);
        assert_eq!(t1, t2);
        assert_eq!(t1.as_str(), "/buckets/bucket1/groups/g1");
    }

    #[test]
    fn test_distinct_groups_distinct_tokens() {
        let bucket = BucketId::new("bucket1");
        let t1 = AuthorityToken::for_group(&bucket, &GroupId::new("g1"));
        let t2 = AuthorityToken::for_group(&bucket, &GroupId::new("g2"));
        assert_ne!(t1, t2);

        let other = BucketId::new("bucket2");
        let t3 = AuthorityToken::for_group(&other, &GroupId::new("g1"));
        assert_ne!(t1, t3);
    }

    #[test]
    fn test_token_parse_roundtrip() {
        let bucket = BucketId::new("b");
        let group = GroupId::new("team-a");
        let token = AuthorityToken::for_group(&bucket, &group);
        let (b, g) = AuthorityToken::parse(token.as_str()).unwrap();
        assert_eq!(b, bucket);
        assert_eq!(g, group);
    }

    #[test]
    fn test_token_parse_rejects_malformed() {
        assert!(AuthorityToken::parse("/accounts/a").is_err());
        assert!(AuthorityToken::parse("/buckets//groups/g").is_err());
        assert!(AuthorityToken::parse("/buckets/b/groups/").is_err());
        assert!(AuthorityToken::parse("/buckets/b/groups/g/extra").is_err());
    }
}
