//! Federation error types.

use thiserror::Error;

/// Errors that can occur while bridging a directory login into the
/// identity store.
#[derive(Debug, Error)]
pub enum FederationError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connection error to the directory.
    #[error("Connection error: {0}")]
    Connection(String),

    /// User not found in the directory (also covers ambiguous matches
    /// and unrecoverable connectivity, which are indistinguishable to
    /// the caller).
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Storage error while reconciling accounts or groups.
    ///
    /// Not recovered locally; a partial reconciliation is worse than a
    /// failed attempt the caller can retry.
    #[error("Storage error: {0}")]
    Storage(#[from] idbridge_storage::StorageError),
}

impl FederationError {
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

    /// Creates a user-not-found error.
    #[must_use]
    pub fn user_not_found(msg: impl Into<String>) -> Self {
        Self::UserNotFound(msg.into())
    }

    /// Checks if this is a user-not-found error.
    #[must_use]
    pub const fn is_user_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_))
    }

    /// Checks if this is a storage error.
    #[must_use]
    pub const fn is_storage_error(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Result type for federation operations.
pub type FederationResult<T> = Result<T, FederationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use idbridge_storage::StorageError;
    use uuid::Uuid;

    #[test]
    fn error_categories() {
        assert!(FederationError::user_not_found("jdoe").is_user_not_found());
        assert!(!FederationError::connection("refused").is_user_not_found());

        let err: FederationError = StorageError::not_found("Account", Uuid::now_v7()).into();
        assert!(err.is_storage_error());
    }
}
