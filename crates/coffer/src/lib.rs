//! # Coffer
//!
//! Group membership with a synchronized permission index.
//!
//! ## Overview
//!
//! Coffer stores named groups of principals per bucket and maintains a
//! derived index from each principal to the authority tokens its group
//! memberships grant. The invariant: a (principal, token) grant exists
//! iff the principal is currently a member of the live group deriving
//! that token. The [`Coffer`] facade upholds this across every write:
//!
//! - create/replace runs the membership delta against the index inside
//!   the same operation as the store write
//! - delete reads the full record first, deletes, then cascades
//!   revocation from the pre-read members (tombstones have none)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use coffer::{BucketId, Coffer, CofferConfig, GroupId, Principal};
//! use coffer::perms::SqliteIndex;
//! use coffer::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("groups.db").unwrap();
//!     let index = SqliteIndex::open("grants.db").unwrap();
//!     let coffer = Coffer::new(store, index, CofferConfig::default());
//!
//!     let bucket = BucketId::new("bucket1");
//!     let group = coffer
//!         .put_group(&bucket, GroupId::new("admins"), [Principal::new("alice")])
//!         .await
//!         .unwrap();
//!
//!     let tokens = coffer.tokens_of(&Principal::new("alice")).await.unwrap();
//!     assert!(tokens.contains(&group.authority_token(&bucket)));
//! }
//! ```

//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `coffer::core` - Core primitives (GroupRecord, AuthorityToken, etc.)
//! - `coffer::store` - Membership storage abstraction and SQLite
//! - `coffer::sync` - The synchronization engine
//! - `coffer::perms` - The permission index

pub mod error;
mod idgen;
pub mod service;

// Re-export component crates
pub use coffer_core as core;
pub use coffer_perms as perms;
pub use coffer_store as store;
pub use coffer_sync as sync;

// Re-export main types for convenience
pub use error::{CofferError, Result};
pub use service::{Coffer, CofferConfig};

// Re-export commonly used core types
pub use coffer_core::{
    AuthorityToken, BucketId, ChangeBatch, ChangeEntry, GroupId, GroupRecord, Principal,
    Tombstone,
};
