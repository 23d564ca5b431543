//! In-memory identity store.
//!
//! Reference backend used by the test suites. Enforces the same
//! uniqueness rules a real backend would (unique usernames, unique
//! group names per parent).

use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use idbridge_model::{Account, Group};
use uuid::Uuid;

use crate::account::{AccountCreateRequest, AccountProvider};
use crate::error::{StorageError, StorageResult};
use crate::group::{GroupCreateRequest, GroupProvider};
use crate::privilege::SystemAccess;

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<Uuid, Account>,
    groups: HashMap<Uuid, Group>,
    memberships: HashMap<Uuid, BTreeSet<Uuid>>,
}

/// In-memory account and group store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a group, returning its id.
    ///
    /// Used by tests to set up the default parent group and
    /// pre-existing groups without going through the provider trait.
    pub fn seed_group(&self, group: Group) -> Uuid {
        let id = group.id;
        self.lock().groups.insert(id, group);
        id
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl AccountProvider for MemoryStore {
    async fn get_by_username(&self, username: &str) -> StorageResult<Option<Account>> {
        let state = self.lock();
        Ok(state
            .accounts
            .values()
            .find(|account| account.username == username)
            .cloned())
    }

    async fn groups_of_account(
        &self,
        _access: &SystemAccess,
        account_id: Uuid,
    ) -> StorageResult<Vec<Uuid>> {
        let state = self.lock();
        if !state.accounts.contains_key(&account_id) {
            return Err(StorageError::not_found("Account", account_id));
        }
        Ok(state
            .memberships
            .get(&account_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn assign_to_group(
        &self,
        _access: &SystemAccess,
        account_id: Uuid,
        group_id: Uuid,
    ) -> StorageResult<()> {
        let mut state = self.lock();
        if !state.accounts.contains_key(&account_id) {
            return Err(StorageError::not_found("Account", account_id));
        }
        if !state.groups.contains_key(&group_id) {
            return Err(StorageError::not_found("Group", group_id));
        }
        state.memberships.entry(account_id).or_default().insert(group_id);
        Ok(())
    }

    async fn unassign_from_group(
        &self,
        _access: &SystemAccess,
        account_id: Uuid,
        group_id: Uuid,
    ) -> StorageResult<()> {
        let mut state = self.lock();
        if !state.accounts.contains_key(&account_id) {
            return Err(StorageError::not_found("Account", account_id));
        }
        state
            .memberships
            .entry(account_id)
            .or_default()
            .remove(&group_id);
        Ok(())
    }

    async fn create(
        &self,
        _access: &SystemAccess,
        request: AccountCreateRequest,
        group_ids: &[Uuid],
    ) -> StorageResult<Account> {
        let mut state = self.lock();
        if state
            .accounts
            .values()
            .any(|account| account.username == request.username)
        {
            return Err(StorageError::duplicate("Account", "username", request.username));
        }
        for group_id in group_ids {
            if !state.groups.contains_key(group_id) {
                return Err(StorageError::not_found("Group", *group_id));
            }
        }

        let mut account = Account::new(request.username, request.owner_id)
            .with_attributes(request.attributes);
        account.email = request.email;
        account.enabled = request.enabled;

        state
            .memberships
            .insert(account.id, group_ids.iter().copied().collect());
        state.accounts.insert(account.id, account.clone());
        Ok(account)
    }
}

#[async_trait]
impl GroupProvider for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> StorageResult<Option<Group>> {
        Ok(self.lock().groups.get(&id).cloned())
    }

    async fn find_by_names(
        &self,
        _access: &SystemAccess,
        names: &[String],
    ) -> StorageResult<Vec<Group>> {
        let state = self.lock();
        let folded: Vec<String> = names.iter().map(|name| name.to_lowercase()).collect();
        Ok(state
            .groups
            .values()
            .filter(|group| folded.iter().any(|name| *name == group.name.to_lowercase()))
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        _access: &SystemAccess,
        request: GroupCreateRequest,
    ) -> StorageResult<Group> {
        let mut state = self.lock();
        if state
            .groups
            .values()
            .any(|group| group.name == request.name && group.parent_id == request.parent_id)
        {
            return Err(StorageError::duplicate("Group", "name", request.name));
        }

        let group = match request.parent_id {
            Some(parent_id) => Group::new_child(parent_id, request.name),
            None => Group::new(request.name),
        };
        state.groups.insert(group.id, group.clone());
        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_rejects_duplicate_username() {
        let store = MemoryStore::new();
        let access = SystemAccess::acquire();
        let owner = Uuid::now_v7();

        let request = AccountCreateRequest::new("jdoe", "secret", owner);
        AccountProvider::create(&store, &access, request.clone(), &[])
            .await
            .unwrap();

        let err = AccountProvider::create(&store, &access, request, &[])
            .await
            .unwrap_err();
        assert!(err.is_duplicate());
    }

    #[tokio::test]
    async fn membership_roundtrip() {
        let store = MemoryStore::new();
        let access = SystemAccess::acquire();
        let group_id = store.seed_group(Group::new("Sales"));

        let account = AccountProvider::create(
            &store,
            &access,
            AccountCreateRequest::new("jdoe", "secret", Uuid::now_v7()),
            &[group_id],
        )
        .await
        .unwrap();

        let groups = store.groups_of_account(&access, account.id).await.unwrap();
        assert_eq!(groups, vec![group_id]);

        store
            .unassign_from_group(&access, account.id, group_id)
            .await
            .unwrap();
        let groups = store.groups_of_account(&access, account.id).await.unwrap();
        assert!(groups.is_empty());
    }

    #[tokio::test]
    async fn find_by_names_matches_case_insensitively() {
        let store = MemoryStore::new();
        let access = SystemAccess::acquire();
        let sales_id = store.seed_group(Group::new("Sales"));

        let found = store
            .find_by_names(&access, &["Sales".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        let found = store
            .find_by_names(&access, &["sales".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, sales_id);

        let found = store
            .find_by_names(&access, &["support".to_string()])
            .await
            .unwrap();
        assert!(found.is_empty());
    }
}
