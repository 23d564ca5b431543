//! Identity-store group record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user group in the target identity store.
///
/// Groups created on demand from directory group names live under the
/// configured default parent group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Parent group (None for top-level groups).
    pub parent_id: Option<Uuid>,
    /// When the group was created.
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Creates a new top-level group.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            parent_id: None,
            created_at: Utc::now(),
        }
    }

    /// Creates a new group under a parent.
    #[must_use]
    pub fn new_child(parent_id: Uuid, name: impl Into<String>) -> Self {
        let mut group = Self::new(name);
        group.parent_id = Some(parent_id);
        group
    }

    /// Checks if this is a top-level group.
    #[must_use]
    pub const fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_group() {
        let group = Group::new("Sales");

        assert_eq!(group.name, "Sales");
        assert!(group.is_top_level());
    }

    #[test]
    fn child_group() {
        let parent = Uuid::now_v7();
        let group = Group::new_child(parent, "Sales");

        assert!(!group.is_top_level());
        assert_eq!(group.parent_id, Some(parent));
    }
}
