//! Directory entries and search scope.

use std::collections::HashMap;

use ldap3::SearchEntry;
use serde::{Deserialize, Serialize};

/// A directory entry with parsed attributes.
///
/// Attributes are multi-valued by nature; single-valued unwrapping
/// happens at conversion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Distinguished name.
    pub dn: String,
    /// Attribute name to values.
    pub attributes: HashMap<String, Vec<String>>,
}

impl DirectoryEntry {
    /// Creates an entry from a DN and attribute pairs.
    #[must_use]
    pub fn new<I, S>(dn: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<String>)>,
        S: Into<String>,
    {
        Self {
            dn: dn.into(),
            attributes: attributes
                .into_iter()
                .map(|(name, values)| (name.into(), values))
                .collect(),
        }
    }

    /// Creates an entry from an `ldap3` search result.
    #[must_use]
    pub fn from_search_entry(entry: SearchEntry) -> Self {
        Self {
            dn: entry.dn,
            attributes: entry.attrs,
        }
    }

    /// Gets the first value of an attribute.
    #[must_use]
    pub fn attr_first(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Gets all values of an attribute.
    #[must_use]
    pub fn attr_all(&self, name: &str) -> Option<&Vec<String>> {
        self.attributes.get(name)
    }

    /// Checks if the entry has an attribute.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }
}

/// LDAP search scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchScope {
    /// Search only the base DN.
    Base,
    /// Search one level below the base DN.
    OneLevel,
    /// Search the entire subtree.
    #[default]
    Subtree,
}

impl SearchScope {
    /// Converts to the `ldap3` scope.
    #[must_use]
    pub const fn to_ldap3(self) -> ldap3::Scope {
        match self {
            Self::Base => ldap3::Scope::Base,
            Self::OneLevel => ldap3::Scope::OneLevel,
            Self::Subtree => ldap3::Scope::Subtree,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_attribute_access() {
        let entry = DirectoryEntry::new(
            "uid=jdoe,ou=users,dc=example,dc=com",
            [
                ("cn", vec!["John Doe".to_string()]),
                ("mail", vec!["jdoe@example.com".to_string()]),
            ],
        );

        assert_eq!(entry.attr_first("cn"), Some("John Doe"));
        assert_eq!(entry.attr_first("missing"), None);
        assert!(entry.has_attr("mail"));
        assert!(!entry.has_attr("missing"));
    }

    #[test]
    fn attr_first_takes_first_of_multi() {
        let entry = DirectoryEntry::new(
            "cn=x",
            [("memberOf", vec!["a".to_string(), "b".to_string()])],
        );

        assert_eq!(entry.attr_first("memberOf"), Some("a"));
        assert_eq!(entry.attr_all("memberOf").map(Vec::len), Some(2));
    }
}
