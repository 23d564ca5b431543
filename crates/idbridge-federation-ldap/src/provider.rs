//! LDAP authentication provider.
//!
//! Orchestrates the per-login bind, search, group resolution, and
//! conversion sequence.

use std::sync::Arc;

use idbridge_model::FederatedUser;

use crate::config::LdapConfig;
use crate::connection::DirectoryClient;
use crate::error::{LdapError, LdapResult};
use crate::mapper::DirectoryEntryConverter;
use crate::resolver::EntryGroupResolver;

/// Authenticates usernames against the directory and builds the
/// federated user record for each match.
///
/// A plain struct over a [`DirectoryClient`]; no provider base class.
/// One instance serves concurrent logins.
pub struct LdapAuthenticationProvider<C> {
    client: C,
    config: Arc<LdapConfig>,
    resolver: EntryGroupResolver,
    converter: DirectoryEntryConverter,
}

impl<C> LdapAuthenticationProvider<C>
where
    C: DirectoryClient,
{
    /// Creates a provider over the given client and configuration.
    #[must_use]
    pub fn new(client: C, config: LdapConfig) -> Self {
        let config = Arc::new(config);
        Self {
            client,
            resolver: EntryGroupResolver::new(Arc::clone(&config)),
            converter: DirectoryEntryConverter::new(Arc::clone(&config)),
            config,
        }
    }

    /// Returns the provider configuration.
    #[must_use]
    pub fn config(&self) -> &LdapConfig {
        &self.config
    }

    /// Looks up a username in the directory.
    ///
    /// A first bind failure is logged and swallowed, then bind and
    /// search are attempted once more; if the retry also fails the
    /// attempt ends as `UserNotFound` wrapping the connectivity cause,
    /// so callers cannot distinguish a downed directory from an absent
    /// user. There is no further retry and no internal timeout; callers
    /// wrap the whole call.
    ///
    /// ## Errors
    ///
    /// `LdapError::UserNotFound` for zero matches, ambiguous matches,
    /// and unrecoverable connectivity.
    pub async fn authenticate(&self, username: &str) -> LdapResult<FederatedUser> {
        if let Err(err) = self.bind_service().await {
            tracing::error!(error = %err, "directory bind failed, retrying once");
        }
        if let Err(err) = self.bind_service().await {
            return Err(LdapError::unreachable(username, &err));
        }

        let filter = self.config.user_filter(username);
        let mut entries = self
            .client
            .search(
                &self.config.base_dn,
                self.config.search_scope,
                &filter,
                &self.config.requested_attributes,
            )
            .await
            .map_err(|err| LdapError::unreachable(username, &err))?;

        if entries.len() > 1 {
            return Err(LdapError::ambiguous(username, entries.len()));
        }
        let Some(entry) = entries.pop() else {
            return Err(LdapError::user_not_found(username));
        };

        let username = self.canonical_username(username, &entry);
        let groups = self.resolver.resolve_groups(&self.client, &entry).await;
        Ok(self.converter.convert(&username, &entry, groups))
    }

    async fn bind_service(&self) -> LdapResult<()> {
        self.client
            .bind(&self.config.bind_dn, &self.config.bind_password)
            .await
    }

    /// Re-derives the canonical username from the UID attribute.
    ///
    /// The attribute must be single-valued; anything else keeps the
    /// supplied username and logs a warning rather than failing the
    /// whole attempt.
    fn canonical_username(&self, supplied: &str, entry: &crate::search::DirectoryEntry) -> String {
        let Some(uid_attribute) = &self.config.uid_attribute else {
            return supplied.to_string();
        };

        match entry.attr_all(uid_attribute).map(Vec::as_slice) {
            Some([value]) => value.clone(),
            Some(values) => {
                tracing::warn!(
                    attribute = %uid_attribute,
                    values = values.len(),
                    dn = %entry.dn,
                    "UID attribute is not single-valued, keeping supplied username"
                );
                supplied.to_string()
            }
            None => {
                tracing::warn!(
                    attribute = %uid_attribute,
                    dn = %entry.dn,
                    "UID attribute missing on entry, keeping supplied username"
                );
                supplied.to_string()
            }
        }
    }
}
