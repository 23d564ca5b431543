//! # idbridge-model
//!
//! Domain models for the directory-to-identity-store bridge.
//!
//! This crate defines the records that flow between the directory side
//! (a [`FederatedUser`] built per login) and the identity store side
//! ([`Account`] and [`Group`]).

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod account;
pub mod group;
pub mod user;

pub use account::Account;
pub use group::Group;
pub use user::{AttributeValue, FederatedUser};
