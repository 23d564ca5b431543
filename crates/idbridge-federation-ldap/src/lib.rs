//! # idbridge-federation-ldap
//!
//! LDAP authentication provider for the bridge, built on `ldap3`.
//!
//! Per login attempt the [`LdapAuthenticationProvider`] binds with
//! service credentials, searches for the matching entry, resolves its
//! group memberships to names, and converts the result into a
//! [`FederatedUser`](idbridge_model::FederatedUser) ready for
//! reconciliation into the identity store.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod connection;
pub mod error;
pub mod mapper;
pub mod provider;
pub mod resolver;
pub mod search;

pub use config::LdapConfig;
pub use connection::{DirectoryClient, LdapDirectoryClient};
pub use error::{LdapError, LdapResult};
pub use mapper::DirectoryEntryConverter;
pub use provider::LdapAuthenticationProvider;
pub use resolver::EntryGroupResolver;
pub use search::{DirectoryEntry, SearchScope};
