//! # idbridge-federation
//!
//! Reconciliation of federated users into the identity store.
//!
//! Given a [`FederatedUser`](idbridge_model::FederatedUser) built from a
//! directory entry, the [`IdentityReconciler`] finds or creates the
//! matching account and brings its group memberships in line with the
//! directory-resolved groups.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod credential;
pub mod error;
pub mod reconcile;

pub use credential::initial_credential;
pub use error::{FederationError, FederationResult};
pub use reconcile::{IdentityReconciler, ReconcilerConfig};
