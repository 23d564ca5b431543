//! Group storage provider trait.

use async_trait::async_trait;
use idbridge_model::Group;
use uuid::Uuid;

use crate::error::StorageResult;
use crate::privilege::SystemAccess;

/// Provider for group storage operations.
///
/// Implementations must be thread-safe and support concurrent access.
#[async_trait]
pub trait GroupProvider: Send + Sync {
    /// Gets a group by id.
    async fn get_by_id(&self, id: Uuid) -> StorageResult<Option<Group>>;

    /// Finds user groups whose display name is one of `names`.
    ///
    /// The match is case-insensitive using the Unicode simple lowercase
    /// mapping, so a lookup for `"sales"` returns an existing `"Sales"`
    /// group rather than treating it as missing.
    async fn find_by_names(
        &self,
        access: &SystemAccess,
        names: &[String],
    ) -> StorageResult<Vec<Group>>;

    /// Creates a new group.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Duplicate` if a group with the same name
    /// exists under the same parent.
    async fn create(
        &self,
        access: &SystemAccess,
        request: GroupCreateRequest,
    ) -> StorageResult<Group>;
}

#[async_trait]
impl<T> GroupProvider for std::sync::Arc<T>
where
    T: GroupProvider + ?Sized,
{
    async fn get_by_id(&self, id: Uuid) -> StorageResult<Option<Group>> {
        (**self).get_by_id(id).await
    }

    async fn find_by_names(
        &self,
        access: &SystemAccess,
        names: &[String],
    ) -> StorageResult<Vec<Group>> {
        (**self).find_by_names(access, names).await
    }

    async fn create(
        &self,
        access: &SystemAccess,
        request: GroupCreateRequest,
    ) -> StorageResult<Group> {
        (**self).create(access, request).await
    }
}

/// Request to create a new group.
#[derive(Debug, Clone)]
pub struct GroupCreateRequest {
    /// Display name.
    pub name: String,
    /// Parent group.
    pub parent_id: Option<Uuid>,
}

impl GroupCreateRequest {
    /// Creates a request for a group under a parent.
    #[must_use]
    pub fn under_parent(name: impl Into<String>, parent_id: Uuid) -> Self {
        Self {
            name: name.into(),
            parent_id: Some(parent_id),
        }
    }
}
