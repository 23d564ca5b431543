//! LDAP-specific error types.
//!
//! Error messages must not leak bind credentials or entry contents;
//! they carry usernames and operational context only.

use idbridge_federation::FederationError;
use thiserror::Error;

/// LDAP-specific errors.
#[derive(Debug, Error)]
pub enum LdapError {
    /// Invalid configuration.
    #[error("LDAP configuration error: {0}")]
    Configuration(String),

    /// Connection to the directory failed.
    #[error("LDAP connection failed: {0}")]
    Connection(String),

    /// Bind (service authentication) failed.
    #[error("LDAP bind failed: {0}")]
    Bind(String),

    /// Search operation failed.
    #[error("LDAP search failed: {0}")]
    Search(String),

    /// User not found.
    ///
    /// Deliberately also covers ambiguous matches and unrecoverable
    /// connectivity: the caller is not told whether the directory was
    /// down or the user absent.
    #[error("User not found: {0}")]
    UserNotFound(String),
}

impl LdapError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a user-not-found error for a username with no match.
    #[must_use]
    pub fn user_not_found(username: &str) -> Self {
        Self::UserNotFound(format!("no directory entry matched '{username}'"))
    }

    /// Creates a user-not-found error for an ambiguous match.
    #[must_use]
    pub fn ambiguous(username: &str, count: usize) -> Self {
        Self::UserNotFound(format!(
            "search for '{username}' matched {count} entries"
        ))
    }

    /// Creates a user-not-found error wrapping a connectivity cause.
    #[must_use]
    pub fn unreachable(username: &str, cause: &Self) -> Self {
        Self::UserNotFound(format!(
            "directory unreachable while looking up '{username}': {cause}"
        ))
    }

    /// Checks if this is a connection-related error.
    #[must_use]
    pub const fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Bind(_))
    }

    /// Checks if this is a user-not-found error.
    #[must_use]
    pub const fn is_user_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_))
    }
}

/// Result type for LDAP operations.
pub type LdapResult<T> = Result<T, LdapError>;

impl From<LdapError> for FederationError {
    fn from(err: LdapError) -> Self {
        match err {
            LdapError::Configuration(msg) => Self::Configuration(msg),
            LdapError::Connection(msg) | LdapError::Bind(msg) | LdapError::Search(msg) => {
                Self::Connection(msg)
            }
            LdapError::UserNotFound(msg) => Self::UserNotFound(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_categories() {
        assert!(LdapError::connection("refused").is_connection_error());
        assert!(LdapError::Bind("refused".to_string()).is_connection_error());
        assert!(LdapError::user_not_found("jdoe").is_user_not_found());
        assert!(!LdapError::config("bad").is_user_not_found());
    }

    #[test]
    fn ambiguous_message_is_distinct() {
        let err = LdapError::ambiguous("jdoe", 2);
        assert!(err.to_string().contains("matched 2 entries"));
        assert!(err.is_user_not_found());
    }

    #[test]
    fn connectivity_collapses_into_user_not_found() {
        let cause = LdapError::connection("refused");
        let err: FederationError = LdapError::unreachable("jdoe", &cause).into();
        assert!(matches!(err, FederationError::UserNotFound(_)));
    }
}
