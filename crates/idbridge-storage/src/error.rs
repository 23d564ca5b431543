//! Storage error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during identity-store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Entity not found by id.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity (e.g., "Account", "Group").
        entity_type: &'static str,
        /// Entity ID.
        id: Uuid,
    },

    /// Entity not found by name.
    #[error("Entity not found: {entity_type} with name '{name}'")]
    NotFoundByName {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity name.
        name: String,
    },

    /// Duplicate entity (unique constraint violation).
    ///
    /// Concurrent logins for the same new identity can race on account
    /// or group creation; the store reports the loser of the race here
    /// and the attempt fails without local recovery.
    #[error("Duplicate {entity_type}: {field} '{value}' already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Field that caused the conflict.
        field: &'static str,
        /// Conflicting value.
        value: String,
    },

    /// Invalid data passed to the store.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Store connection error.
    #[error("Store connection error: {0}")]
    Connection(String),

    /// Store query error.
    #[error("Store query error: {0}")]
    Query(String),

    /// Internal storage error.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Creates a not-found error.
    #[must_use]
    pub const fn not_found(entity_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity_type, id }
    }

    /// Creates a duplicate-entity error.
    #[must_use]
    pub fn duplicate(
        entity_type: &'static str,
        field: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::Duplicate {
            entity_type,
            field,
            value: value.into(),
        }
    }

    /// Checks if this is a duplicate-entity error.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Checks if this is a not-found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NotFoundByName { .. })
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_categories() {
        assert!(StorageError::not_found("Account", Uuid::now_v7()).is_not_found());
        assert!(StorageError::duplicate("Account", "username", "jdoe").is_duplicate());
        assert!(!StorageError::duplicate("Group", "name", "Sales").is_not_found());
    }

    #[test]
    fn duplicate_message_names_the_conflict() {
        let err = StorageError::duplicate("Group", "name", "Sales");
        assert_eq!(err.to_string(), "Duplicate Group: name 'Sales' already exists");
    }
}
