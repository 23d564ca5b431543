//! Identity-store account record.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::AttributeValue;

/// An account in the target identity store, keyed by username.
///
/// Accounts are created when a login has no matching record; on later
/// logins only the group memberships are reconciled, the account fields
/// themselves are left untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: Uuid,
    /// Unique username within the store.
    pub username: String,
    /// Email address, set at creation time.
    pub email: Option<String>,
    /// Whether the account is enabled.
    pub enabled: bool,
    /// Owning administrative account.
    pub owner_id: Uuid,
    /// Mapped attribute fields, set at creation time.
    pub attributes: HashMap<String, AttributeValue>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new enabled account.
    #[must_use]
    pub fn new(username: impl Into<String>, owner_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            username: username.into(),
            email: None,
            enabled: true,
            owner_id,
            attributes: HashMap::new(),
            created_at: now,
            updated_at: now,
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

    /// Gets the first value of a mapped attribute.
    #[must_use]
    pub fn get_first_attribute(&self, field: &str) -> Option<&str> {
        self.attributes.get(field).and_then(AttributeValue::first)
    }
}
