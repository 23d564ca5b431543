//! # idbridge-storage
//!
//! Identity-store abstraction traits for the bridge.
//!
//! This crate defines the provider interfaces the reconciliation layer
//! consumes. Concrete backends (the application's own persistence
//! engine) implement these traits; an in-memory backend is included for
//! tests and as a reference implementation.
//!
//! ## Provider Traits
//!
//! - [`AccountProvider`] - lookup, creation, and group membership of accounts
//! - [`GroupProvider`] - lookup and on-demand creation of user groups
//!
//! Mutating operations require a [`SystemAccess`] capability, making the
//! elevated-privilege execution mode explicit at every call site.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod account;
pub mod error;
pub mod group;
pub mod mem;
pub mod privilege;

pub use account::{AccountCreateRequest, AccountProvider};
pub use error::{StorageError, StorageResult};
pub use group::{GroupCreateRequest, GroupProvider};
pub use mem::MemoryStore;
pub use privilege::SystemAccess;
