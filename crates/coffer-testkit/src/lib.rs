//! # Coffer Testkit
//!
//! Testing utilities for Coffer.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: prewired in-memory setups and the [`GuardStore`]
//!   ordering double
//! - **Generators**: proptest strategies for records, member sets, and
//!   change batches
//!
//! ## The GuardStore
//!
//! Deletion destroys a record's member list, so any component that
//! needs members for cascade work must read them first. [`GuardStore`]
//! wraps the in-memory store and panics if a deleted record is read
//! again - a delete path with the read on the wrong side of the delete
//! fails loudly instead of silently revoking nothing.
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use coffer_testkit::generators::change_batch;
//!
//! proptest! {
//!     #[test]
//!     fn batches_apply_cleanly(batch in change_batch(4)) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{record, GuardStore, TestFixture};
