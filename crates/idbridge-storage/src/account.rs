//! Account storage provider trait.

use std::collections::HashMap;

use async_trait::async_trait;
use idbridge_model::{Account, AttributeValue};
use uuid::Uuid;

use crate::error::StorageResult;
use crate::privilege::SystemAccess;

/// Provider for account storage operations.
///
/// Implementations must be thread-safe and support concurrent access.
/// Assign/unassign atomicity and duplicate detection on concurrent
/// creation are the backend's responsibility; this layer adds no
/// locking of its own.
#[async_trait]
pub trait AccountProvider: Send + Sync {
    /// Gets an account by username.
    async fn get_by_username(&self, username: &str) -> StorageResult<Option<Account>>;

    /// Gets the ids of the groups an account belongs to.
    async fn groups_of_account(
        &self,
        access: &SystemAccess,
        account_id: Uuid,
    ) -> StorageResult<Vec<Uuid>>;

    /// Adds an account to a group.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if either side doesn't exist.
    async fn assign_to_group(
        &self,
        access: &SystemAccess,
        account_id: Uuid,
        group_id: Uuid,
    ) -> StorageResult<()>;

    /// Removes an account from a group.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if either side doesn't exist.
    async fn unassign_from_group(
        &self,
        access: &SystemAccess,
        account_id: Uuid,
        group_id: Uuid,
    ) -> StorageResult<()>;

    /// Creates an account as a member of the given groups.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if an account with the same
    /// username already exists.
    async fn create(
        &self,
        access: &SystemAccess,
        request: AccountCreateRequest,
        group_ids: &[Uuid],
    ) -> StorageResult<Account>;
}

#[async_trait]
impl<T> AccountProvider for std::sync::Arc<T>
where
    T: AccountProvider + ?Sized,
{
    async fn get_by_username(&self, username: &str) -> StorageResult<Option<Account>> {
        (**self).get_by_username(username).await
    }

    async fn groups_of_account(
        &self,
        access: &SystemAccess,
        account_id: Uuid,
    ) -> StorageResult<Vec<Uuid>> {
        (**self).groups_of_account(access, account_id).await
    }

    async fn assign_to_group(
        &self,
        access: &SystemAccess,
        account_id: Uuid,
        group_id: Uuid,
    ) -> StorageResult<()> {
        (**self).assign_to_group(access, account_id, group_id).await
    }

    async fn unassign_from_group(
        &self,
        access: &SystemAccess,
        account_id: Uuid,
        group_id: Uuid,
    ) -> StorageResult<()> {
        (**self).unassign_from_group(access, account_id, group_id).await
    }

    async fn create(
        &self,
        access: &SystemAccess,
        request: AccountCreateRequest,
        group_ids: &[Uuid],
    ) -> StorageResult<Account> {
        (**self).create(access, request, group_ids).await
    }
}

/// Request to create a new account.
#[derive(Debug, Clone)]
pub struct AccountCreateRequest {
    /// Unique username.
    pub username: String,
    /// Email address.
    pub email: Option<String>,
    /// Initial credential.
    ///
    /// The directory remains the authority for authentication; this
    /// value exists only because the store requires one and must be
    /// unguessable.
    pub initial_credential: String,
    /// Mapped attribute fields.
    pub attributes: HashMap<String, AttributeValue>,
    /// Whether the account starts enabled.
    pub enabled: bool,
    /// Owning administrative account.
    pub owner_id: Uuid,
}

impl AccountCreateRequest {
    /// Creates a request for an enabled account.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        initial_credential: impl Into<String>,
        owner_id: Uuid,
    ) -> Self {
        Self {
            username: username.into(),
            email: None,
            initial_credential: initial_credential.into(),
            attributes: HashMap::new(),
            enabled: true,
            owner_id,
        }
    }

    /// Sets the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the mapped attribute fields.
    #[must_use]
    pub fn with_attributes(mut self, attributes: HashMap<String, AttributeValue>) -> Self {
        self.attributes = attributes;
        self
    }
}
