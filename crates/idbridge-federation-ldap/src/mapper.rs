//! Conversion of directory entries into federated users.

use std::sync::Arc;

use idbridge_model::{AttributeValue, FederatedUser};

use crate::config::LdapConfig;
use crate::search::DirectoryEntry;

/// Maps a directory entry plus resolved group names to a
/// [`FederatedUser`].
pub struct DirectoryEntryConverter {
    config: Arc<LdapConfig>,
}

impl DirectoryEntryConverter {
    /// Creates a converter for the given configuration.
    #[must_use]
    pub const fn new(config: Arc<LdapConfig>) -> Self {
        Self { config }
    }

    /// Builds the federated user record.
    ///
    /// Mapped attributes with exactly one value become scalars, several
    /// values stay a list, and absent attributes are omitted. The role
    /// set is the configured default roles.
    #[must_use]
    pub fn convert(
        &self,
        username: &str,
        entry: &DirectoryEntry,
        groups: Vec<String>,
    ) -> FederatedUser {
        let mut user = FederatedUser::new(username, self.config.default_roles.iter().cloned())
            .with_groups(groups);

        for (local_field, directory_attribute) in &self.config.attribute_map {
            let value = entry
                .attr_all(directory_attribute)
                .cloned()
                .and_then(AttributeValue::from_values);
            if let Some(value) = value {
                user.set_attribute(local_field.clone(), value);
            }
        }

        user.email = entry.attr_first(&self.config.email_attribute).map(String::from);
        user
    }
}
