//! In-memory implementation of the PermissionIndex trait.
//!
//! Same semantics as the SQLite index, no persistence. Used in tests
//! and as the default index for embedded setups.

use std::collections::{BTreeSet, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;

use coffer_core::{AuthorityToken, Principal};

use crate::error::Result;
use crate::index::PermissionIndex;

/// In-memory permission index. Thread-safe via RwLock.
pub struct MemoryIndex {
    grants: RwLock<HashMap<Principal, BTreeSet<AuthorityToken>>>,
}

impl MemoryIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self {
            grants: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PermissionIndex for MemoryIndex {
    async fn grant(&self, principal: &Principal, token: &AuthorityToken) -> Result<()> {
        let mut grants = self.grants.write().unwrap();
        grants
            .entry(principal.clone())
            .or_default()
            .insert(token.clone());
        Ok(())
    }

    async fn revoke(&self, principal: &Principal, token: &AuthorityToken) -> Result<()> {
        let mut grants = self.grants.write().unwrap();
        if let Some(tokens) = grants.get_mut(principal) {
            tokens.remove(token);
            if tokens.is_empty() {
                grants.remove(principal);
            }
        }
        Ok(())
    }

    async fn tokens_of(&self, principal: &Principal) -> Result<BTreeSet<AuthorityToken>> {
        let grants = self.grants.read().unwrap();
        Ok(grants.get(principal).cloned().unwrap_or_default())
    }

    async fn principals_of(&self, token: &AuthorityToken) -> Result<BTreeSet<Principal>> {
        let grants = self.grants.read().unwrap();
        Ok(grants
            .iter()
            .filter(|(_, tokens)| tokens.contains(token))
            .map(|(principal, _)| principal.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffer_core::{BucketId, GroupId};

    fn token(group: &str) -> AuthorityToken {
        AuthorityToken::for_group(&BucketId::new("bucket1"), &GroupId::new(group))
    }

    #[tokio::test]
    async fn test_grant_is_idempotent() {
        let index = MemoryIndex::new();
        let alice = Principal::new("alice");

        index.grant(&alice, &token("g1")).await.unwrap();
        index.grant(&alice, &token("g1")).await.unwrap();

        assert_eq!(index.tokens_of(&alice).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let index = MemoryIndex::new();
        let alice = Principal::new("alice");

        index.grant(&alice, &token("g1")).await.unwrap();
        index.revoke(&alice, &token("g1")).await.unwrap();
        index.revoke(&alice, &token("g1")).await.unwrap();

        assert!(index.tokens_of(&alice).await.unwrap().is_empty());

        // Revoking from an unknown principal is also a no-op.
        index.revoke(&Principal::new("ghost"), &token("g1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_principals_of_reverse_lookup() {
        let index = MemoryIndex::new();
        index.grant(&Principal::new("alice"), &token("g1")).await.unwrap();
        index.grant(&Principal::new("bob"), &token("g1")).await.unwrap();
        index.grant(&Principal::new("bob"), &token("g2")).await.unwrap();

        let holders = index.principals_of(&token("g1")).await.unwrap();
        assert_eq!(holders.len(), 2);

        let holders = index.principals_of(&token("g2")).await.unwrap();
        assert_eq!(holders, [Principal::new("bob")].into_iter().collect());
    }
}
