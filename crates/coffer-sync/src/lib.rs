//! # Coffer Sync
//!
//! The synchronization engine: keeps the permission index consistent
//! with group membership across creates, updates, and deletes.
//!
//! ## Overview
//!
//! Group membership and the permission index are independently
//! writable. This crate owns the three pieces that reconcile them:
//!
//! - [`ChangeSynchronizer`] - consumes post-write change batches,
//!   computes each group's membership delta, applies it as idempotent
//!   grants and revokes
//! - [`CascadeRevoker`] - strips every member's grant when groups are
//!   deleted, using pre-deletion records
//! - [`DeleteInterceptor`] - wraps store deletions so full records are
//!   always read before the delete, then cascades from those reads
//!
//! ## Key Properties
//!
//! - **Idempotent**: applying a batch twice equals applying it once
//! - **Commutative per entry**: an entry's add/remove sets are disjoint,
//!   so its own grants can reorder freely
//! - **Failure-isolated**: one failed grant never blocks sibling
//!   principals or sibling entries; failures are logged and reported
//! - **Read-before-delete**: the cascade input type is a full record,
//!   never a tombstone
//!
//! ## Flow
//!
//! ```text
//! create/update ──> ChangeBatch ──> ChangeSynchronizer ──> grants/revokes
//!
//! delete ──> DeleteInterceptor
//!              │  1. read full record(s)
//!              │  2. delete via store (tombstone)
//!              └─ 3. CascadeRevoker(pre-read records) ──> revokes
//! ```

pub mod cascade;
pub mod error;
pub mod interceptor;
pub mod report;
pub mod synchronizer;

pub use cascade::CascadeRevoker;
pub use error::{Result, SyncError};
pub use interceptor::DeleteInterceptor;
pub use report::{GrantFailure, SyncReport};
pub use synchronizer::ChangeSynchronizer;
