//! The PermissionIndex trait: point operations on principal grants.

use std::collections::BTreeSet;

use async_trait::async_trait;
use coffer_core::{AuthorityToken, Principal};

use crate::error::Result;

/// Storage mapping each principal to the authority tokens it holds.
///
/// The index is a shared, externally-synchronized resource: callers
/// never lock it as a whole. Each point operation is individually
/// atomic per (principal, token) pair, and both mutations are
/// idempotent, which is what lets the synchronization engine replay or
/// reorder a delta's own grants safely.
#[async_trait]
pub trait PermissionIndex: Send + Sync {
    /// Grant `token` to `principal`.
    ///
    /// Granting an already-held token is a no-op, not an error.
    async fn grant(&self, principal: &Principal, token: &AuthorityToken) -> Result<()>;

    /// Revoke `token` from `principal`.
    ///
    /// Revoking an absent grant is a no-op, not an error.
    async fn revoke(&self, principal: &Principal, token: &AuthorityToken) -> Result<()>;

    /// All tokens currently held by `principal`.
    async fn tokens_of(&self, principal: &Principal) -> Result<BTreeSet<AuthorityToken>>;

    /// All principals currently holding `token`.
    async fn principals_of(&self, token: &AuthorityToken) -> Result<BTreeSet<Principal>>;
}
