//! LDAP provider configuration.
//!
//! All configuration is explicit and injected at construction; there is
//! no ambient configuration service. Mandatory settings are enforced
//! when the builder runs, so a misconfiguration is a startup error and
//! never a runtime one.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LdapError, LdapResult};
use crate::search::SearchScope;

/// Placeholder in the filter template replaced by the UID attribute key.
pub const UID_KEY_PLACEHOLDER: &str = "{uid_key}";

/// Placeholder in the filter template replaced by the escaped username.
pub const USERNAME_PLACEHOLDER: &str = "{username}";

/// LDAP provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LdapConfig {
    // === Connection ===
    /// Directory server URL.
    pub connection_url: String,
    /// Bind DN for the service account.
    pub bind_dn: String,
    /// Bind password for the service account.
    #[serde(skip_serializing)]
    pub bind_password: String,
    /// Connection timeout.
    pub connection_timeout: Duration,

    // === Search ===
    /// Base DN for user searches.
    pub base_dn: String,
    /// Filter template with `{uid_key}` and `{username}` placeholders.
    pub search_filter: String,
    /// Search scope.
    pub search_scope: SearchScope,
    /// Attributes requested from the directory (empty = all).
    pub requested_attributes: Vec<String>,

    // === Attributes ===
    /// Attribute holding the canonical username, if configured.
    pub uid_attribute: Option<String>,
    /// Attribute holding the entry's password hash.
    ///
    /// Passed through to callers that need it; the core pipeline never
    /// reads it, since authentication stays in the directory.
    pub password_attribute: Option<String>,
    /// Email attribute key.
    pub email_attribute: String,
    /// Mapping from local field name to directory attribute.
    pub attribute_map: HashMap<String, String>,

    // === Groups and roles ===
    /// Attribute listing the group DNs an entry belongs to.
    pub group_membership_attribute: Option<String>,
    /// Attribute holding a group's display name.
    pub group_name_attribute: String,
    /// Roles every federated user carries.
    pub default_roles: Vec<String>,
}

impl LdapConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> LdapConfigBuilder {
        LdapConfigBuilder::new()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> LdapResult<()> {
        if self.bind_dn.is_empty() {
            return Err(LdapError::config("bind_dn cannot be empty"));
        }
        if self.base_dn.is_empty() {
            return Err(LdapError::config("base_dn cannot be empty"));
        }
        if self.email_attribute.is_empty() {
            return Err(LdapError::config("email_attribute cannot be empty"));
        }
        if self.default_roles.is_empty() {
            return Err(LdapError::config("default_roles cannot be empty"));
        }
        if !self.search_filter.contains(USERNAME_PLACEHOLDER) {
            return Err(LdapError::config(format!(
                "search_filter must contain the {USERNAME_PLACEHOLDER} placeholder"
            )));
        }
        if self.search_filter.contains(UID_KEY_PLACEHOLDER) && self.uid_attribute.is_none() {
            return Err(LdapError::config(format!(
                "search_filter uses {UID_KEY_PLACEHOLDER} but no uid_attribute is configured"
            )));
        }
        Ok(())
    }

    /// Builds the user search filter for a raw username.
    ///
    /// The username is escaped before substitution, so caller input can
    /// never alter the filter structure.
    #[must_use]
    pub fn user_filter(&self, username: &str) -> String {
        let escaped = ldap_escape(username);
        let mut filter = self.search_filter.replace(USERNAME_PLACEHOLDER, &escaped);
        if let Some(uid_attribute) = &self.uid_attribute {
            filter = filter.replace(UID_KEY_PLACEHOLDER, uid_attribute);
        }
        filter
    }

    /// Builds the presence filter for group-name lookups.
    #[must_use]
    pub fn group_name_presence_filter(&self) -> String {
        format!("({}=*)", self.group_name_attribute)
    }
}

/// Escapes special characters in an LDAP filter value (RFC 4515).
#[must_use]
pub fn ldap_escape(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => result.push_str("\\5c"),
            '*' => result.push_str("\\2a"),
            '(' => result.push_str("\\28"),
            ')' => result.push_str("\\29"),
            '\0' => result.push_str("\\00"),
            _ => result.push(c),
        }
    }
    result
}

/// Builder for [`LdapConfig`].
#[derive(Debug, Default)]
pub struct LdapConfigBuilder {
    connection_url: Option<String>,
    bind_dn: Option<String>,
    bind_password: Option<String>,
    connection_timeout: Option<Duration>,
    base_dn: Option<String>,
    search_filter: Option<String>,
    search_scope: SearchScope,
    requested_attributes: Vec<String>,
    uid_attribute: Option<String>,
    password_attribute: Option<String>,
    email_attribute: Option<String>,
    attribute_map: HashMap<String, String>,
    group_membership_attribute: Option<String>,
    group_name_attribute: Option<String>,
    default_roles: Vec<String>,
}

impl LdapConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connection URL.
    #[must_use]
    pub fn connection_url(mut self, url: impl Into<String>) -> Self {
        self.connection_url = Some(url.into());
        self
    }

    /// Sets the service bind DN.
    #[must_use]
    pub fn bind_dn(mut self, dn: impl Into<String>) -> Self {
        self.bind_dn = Some(dn.into());
        self
    }

    /// Sets the service bind password.
    #[must_use]
    pub fn bind_password(mut self, password: impl Into<String>) -> Self {
        self.bind_password = Some(password.into());
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = Some(timeout);
        self
    }

    /// Sets the base DN for user searches.
    #[must_use]
    pub fn base_dn(mut self, dn: impl Into<String>) -> Self {
        self.base_dn = Some(dn.into());
        self
    }

    /// Sets the filter template.
    #[must_use]
    pub fn search_filter(mut self, filter: impl Into<String>) -> Self {
        self.search_filter = Some(filter.into());
        self
    }

    /// Sets the search scope.
    #[must_use]
    pub const fn search_scope(mut self, scope: SearchScope) -> Self {
        self.search_scope = scope;
        self
    }

    /// Sets the requested attribute list.
    #[must_use]
    pub fn requested_attributes(mut self, attributes: Vec<String>) -> Self {
        self.requested_attributes = attributes;
        self
    }

    /// Sets the UID attribute key.
    #[must_use]
    pub fn uid_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.uid_attribute = Some(attribute.into());
        self
    }

    /// Sets the password attribute key.
    #[must_use]
    pub fn password_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.password_attribute = Some(attribute.into());
        self
    }

    /// Sets the email attribute key.
    #[must_use]
    pub fn email_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.email_attribute = Some(attribute.into());
        self
    }

    /// Sets the local-field to directory-attribute map.
    #[must_use]
    pub fn attribute_map(mut self, map: HashMap<String, String>) -> Self {
        self.attribute_map = map;
        self
    }

    /// Sets the group membership attribute key.
    #[must_use]
    pub fn group_membership_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.group_membership_attribute = Some(attribute.into());
        self
    }

    /// Sets the group name attribute key.
    #[must_use]
    pub fn group_name_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.group_name_attribute = Some(attribute.into());
        self
    }

    /// Sets the default role list.
    #[must_use]
    pub fn default_roles(mut self, roles: Vec<String>) -> Self {
        self.default_roles = roles;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// ## Errors
    ///
    /// Returns `LdapError::Configuration` if a mandatory field is
    /// missing or the filter template is malformed.
    pub fn build(self) -> LdapResult<LdapConfig> {
        let config = LdapConfig {
            connection_url: self
                .connection_url
                .ok_or_else(|| LdapError::config("connection_url is required"))?,
            bind_dn: self
                .bind_dn
                .ok_or_else(|| LdapError::config("bind_dn is required"))?,
            bind_password: self
                .bind_password
                .ok_or_else(|| LdapError::config("bind_password is required"))?,
            connection_timeout: self.connection_timeout.unwrap_or(Duration::from_secs(5)),
            base_dn: self
                .base_dn
                .ok_or_else(|| LdapError::config("base_dn is required"))?,
            search_filter: self
                .search_filter
                .ok_or_else(|| LdapError::config("search_filter is required"))?,
            search_scope: self.search_scope,
            requested_attributes: self.requested_attributes,
            uid_attribute: self.uid_attribute,
            password_attribute: self.password_attribute,
            email_attribute: self
                .email_attribute
                .ok_or_else(|| LdapError::config("email_attribute is required"))?,
            attribute_map: self.attribute_map,
            group_membership_attribute: self.group_membership_attribute,
            group_name_attribute: self
                .group_name_attribute
                .unwrap_or_else(|| "cn".to_string()),
            default_roles: if self.default_roles.is_empty() {
                vec!["user".to_string()]
            } else {
                self.default_roles
            },
        };

        config.validate()?;
        Ok(config)
    }
}
