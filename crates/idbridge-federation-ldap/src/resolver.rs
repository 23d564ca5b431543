//! Group resolution from directory entries.
//!
//! Turns the group DNs listed on an entry into display names. A group
//! that cannot be resolved never blocks authentication; it simply
//! contributes nothing.

use std::sync::Arc;

use crate::config::LdapConfig;
use crate::connection::DirectoryClient;
use crate::search::{DirectoryEntry, SearchScope};

/// Resolves the group names a directory entry belongs to.
pub struct EntryGroupResolver {
    config: Arc<LdapConfig>,
}

impl EntryGroupResolver {
    /// Creates a resolver for the given configuration.
    #[must_use]
    pub const fn new(config: Arc<LdapConfig>) -> Self {
        Self { config }
    }

    /// Resolves the entry's group DNs to an ordered list of names.
    ///
    /// When a group DN's leading RDN already uses the configured name
    /// attribute, its value is the group name and no lookup happens.
    /// Otherwise the group entry itself is fetched with a presence
    /// search; bind failures, empty results, and missing attributes
    /// skip the group silently.
    pub async fn resolve_groups<C>(&self, client: &C, entry: &DirectoryEntry) -> Vec<String>
    where
        C: DirectoryClient,
    {
        let Some(membership_attribute) = &self.config.group_membership_attribute else {
            return Vec::new();
        };
        let Some(group_dns) = entry.attr_all(membership_attribute) else {
            return Vec::new();
        };

        let mut names = Vec::with_capacity(group_dns.len());
        for group_dn in group_dns {
            match self.resolve_one(client, group_dn).await {
                Some(name) => names.push(name),
                None => {
                    tracing::debug!(dn = %group_dn, "skipping unresolvable group");
                }
            }
        }
        names
    }

    async fn resolve_one<C>(&self, client: &C, group_dn: &str) -> Option<String>
    where
        C: DirectoryClient,
    {
        let (rdn_attribute, rdn_value) = leading_rdn(group_dn)?;

        // Attribute descriptors are ASCII and case-insensitive.
        if rdn_attribute.eq_ignore_ascii_case(&self.config.group_name_attribute) {
            return Some(rdn_value.to_string());
        }

        client
            .bind(&self.config.bind_dn, &self.config.bind_password)
            .await
            .ok()?;

        let entries = client
            .search(
                group_dn,
                SearchScope::Base,
                &self.config.group_name_presence_filter(),
                std::slice::from_ref(&self.config.group_name_attribute),
            )
            .await
            .ok()?;

        entries
            .first()
            .and_then(|entry| entry.attr_first(&self.config.group_name_attribute))
            .map(String::from)
    }
}

/// Splits the leading RDN of a DN into attribute and value.
///
/// Escaped commas inside RDN values are not handled; group DNs written
/// by common directory servers keep the name in the first component.
fn leading_rdn(dn: &str) -> Option<(&str, &str)> {
    let first = dn.split(',').next()?;
    let (attribute, value) = first.split_once('=')?;
    let attribute = attribute.trim();
    let value = value.trim();
    if attribute.is_empty() || value.is_empty() {
        return None;
    }
    Some((attribute, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_rdn_parses_first_component() {
        assert_eq!(
            leading_rdn("cn=Sales,ou=groups,dc=example,dc=com"),
            Some(("cn", "Sales"))
        );
        assert_eq!(
            leading_rdn("CN=Special Group,ou=groups,dc=example,dc=com"),
            Some(("CN", "Special Group"))
        );
        assert_eq!(leading_rdn("not-a-dn"), None);
        assert_eq!(leading_rdn("=empty,dc=example"), None);
    }
}
