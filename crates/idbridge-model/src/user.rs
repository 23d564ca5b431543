//! Federated user transfer object.
//!
//! A [`FederatedUser`] is built once per authentication attempt from a
//! directory entry and carried to the identity store for reconciliation.
//! It is never persisted itself.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Value of a mapped directory attribute.
///
/// Directory attributes are multi-valued by nature; an attribute with
/// exactly one value is unwrapped to a scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// A single-valued attribute.
    Single(String),
    /// A multi-valued attribute.
    Multi(Vec<String>),
}

impl AttributeValue {
    /// Builds a value from raw directory attribute values.
    ///
    /// Returns `None` for an empty value list (absent attributes are
    /// omitted from the user record entirely).
    #[must_use]
    pub fn from_values(mut values: Vec<String>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => values.pop().map(Self::Single),
            _ => Some(Self::Multi(values)),
        }
    }

    /// Gets the first value regardless of arity.
    #[must_use]
    pub fn first(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value),
            Self::Multi(values) => values.first().map(String::as_str),
        }
    }
}

/// A user record derived from a directory entry.
///
/// Immutable after construction. The `roles` set always contains at
/// least the configured default role; `groups` preserves the resolution
/// order from the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederatedUser {
    /// Canonical username (possibly re-derived from the UID attribute).
    pub username: String,
    /// Email address, if the directory entry carried one.
    pub email: Option<String>,
    /// Mapped attributes (local field name to value).
    pub attributes: HashMap<String, AttributeValue>,
    /// Role names (fixed default set).
    pub roles: BTreeSet<String>,
    /// Resolved group names, in resolution order.
    pub groups: Vec<String>,
}

impl FederatedUser {
    /// Creates a user with the given roles and no attributes or groups.
    #[must_use]
    pub fn new<I, S>(username: impl Into<String>, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            username: username.into(),
            email: None,
            attributes: HashMap::new(),
            roles: roles.into_iter().map(Into::into).collect(),
            groups: Vec::new(),
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the resolved group names.
    #[must_use]
    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }

    /// Sets a mapped attribute.
    pub fn set_attribute(&mut self, field: impl Into<String>, value: AttributeValue) {
        self.attributes.insert(field.into(), value);
    }

    /// Gets a mapped attribute.
    #[must_use]
    pub fn get_attribute(&self, field: &str) -> Option<&AttributeValue> {
        self.attributes.get(field)
    }

    /// Checks whether the user carries a role.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_value_unwraps_scalars() {
        assert_eq!(
            AttributeValue::from_values(vec!["a".to_string()]),
            Some(AttributeValue::Single("a".to_string()))
        );
        assert_eq!(
            AttributeValue::from_values(vec!["a".to_string(), "b".to_string()]),
            Some(AttributeValue::Multi(vec!["a".to_string(), "b".to_string()]))
        );
        assert_eq!(AttributeValue::from_values(vec![]), None);
    }

    #[test]
    fn first_value_works_for_both_arities() {
        let single = AttributeValue::Single("x".to_string());
        let multi = AttributeValue::Multi(vec!["y".to_string(), "z".to_string()]);

        assert_eq!(single.first(), Some("x"));
        assert_eq!(multi.first(), Some("y"));
    }

    #[test]
    fn new_user_carries_roles() {
        let user = FederatedUser::new("jdoe", ["member"]);

        assert_eq!(user.username, "jdoe");
        assert!(user.has_role("member"));
        assert!(user.groups.is_empty());
        assert!(user.email.is_none());
    }

    #[test]
    fn builder_pattern_works() {
        let user = FederatedUser::new("jdoe", ["member"])
            .with_email("jdoe@example.com")
            .with_groups(vec!["Sales".to_string()]);

        assert_eq!(user.email, Some("jdoe@example.com".to_string()));
        assert_eq!(user.groups, vec!["Sales".to_string()]);
    }
}
