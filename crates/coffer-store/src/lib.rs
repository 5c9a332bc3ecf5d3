//! # Coffer Store
//!
//! Membership storage for Coffer. Provides a trait-based interface for
//! group-record persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The store module abstracts group storage behind the
//! [`MembershipStore`] trait, allowing the synchronization engine to be
//! storage-agnostic. The primary implementation is [`SqliteStore`], with
//! [`MemoryStore`] for testing.
//!
//! ## Key Types
//!
//! - [`MembershipStore`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage for tests
//! - [`Filter`] - Predicates for list and bulk-delete operations
//!
//! ## Usage
//!
//! ```rust,no_run
//! use coffer_core::{BucketId, GroupId};
//! use coffer_store::{MembershipStore, SqliteStore};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("coffer.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     let bucket = BucketId::new("bucket1");
//!     let record = store.get(&bucket, &GroupId::new("g1")).await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Tombstone retention**: deleting a record keeps its id and
//!   timestamp but discards the member list for good
//! - **Monotonic timestamps**: `last_modified` strictly increases per
//!   bucket, even within one clock tick
//! - **Bucket scoping**: every operation is scoped; ids only collide
//!   within one bucket

pub mod error;
pub mod filter;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use filter::{matches_all, Filter};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::MembershipStore;
