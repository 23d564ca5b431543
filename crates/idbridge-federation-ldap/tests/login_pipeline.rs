//! End-to-end login pipeline tests: directory lookup through account
//! and membership reconciliation, against a scripted directory and the
//! in-memory store.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use idbridge_federation::{IdentityReconciler, ReconcilerConfig};
use idbridge_federation_ldap::{
    DirectoryClient, DirectoryEntry, LdapAuthenticationProvider, LdapConfig, LdapResult,
    SearchScope,
};
use idbridge_model::Group;
use idbridge_storage::{AccountProvider, GroupProvider, MemoryStore, SystemAccess};
use uuid::Uuid;

const BASE_DN: &str = "ou=users,dc=example,dc=com";

/// Directory fixture keyed by search base DN.
struct ScriptedDirectory {
    results: HashMap<String, Vec<DirectoryEntry>>,
}

#[async_trait]
impl DirectoryClient for ScriptedDirectory {
    async fn bind(&self, _dn: &str, _password: &str) -> LdapResult<()> {
        Ok(())
    }

    async fn search(
        &self,
        base_dn: &str,
        _scope: SearchScope,
        _filter: &str,
        _attributes: &[String],
    ) -> LdapResult<Vec<DirectoryEntry>> {
        Ok(self.results.get(base_dn).cloned().unwrap_or_default())
    }
}

fn config() -> LdapConfig {
    LdapConfig::builder()
        .connection_url("ldaps://ldap.example.com:636")
        .bind_dn("cn=service,dc=example,dc=com")
        .bind_password("secret")
        .base_dn(BASE_DN)
        .search_filter("({uid_key}={username})")
        .uid_attribute("uid")
        .email_attribute("mail")
        .group_membership_attribute("memberOf")
        .build()
        .unwrap()
}

fn jdoe_entry(member_of: Vec<String>) -> DirectoryEntry {
    let mut attributes = vec![
        ("uid", vec!["jdoe".to_string()]),
        ("mail", vec!["jdoe@example.com".to_string()]),
    ];
    if !member_of.is_empty() {
        attributes.push(("memberOf", member_of));
    }
    DirectoryEntry::new(format!("uid=jdoe,{BASE_DN}"), attributes)
}

fn provider(
    results: HashMap<String, Vec<DirectoryEntry>>,
) -> LdapAuthenticationProvider<ScriptedDirectory> {
    LdapAuthenticationProvider::new(ScriptedDirectory { results }, config())
}

fn reconciler(
    store: &Arc<MemoryStore>,
    default_group_id: Uuid,
) -> IdentityReconciler<Arc<MemoryStore>, Arc<MemoryStore>> {
    IdentityReconciler::new(
        Arc::clone(store),
        Arc::clone(store),
        ReconcilerConfig::new(Uuid::now_v7(), default_group_id),
    )
}

#[tokio::test]
async fn first_login_creates_account_and_groups() {
    let provider = provider(HashMap::from([(
        BASE_DN.to_string(),
        vec![jdoe_entry(vec![
            "cn=sales,ou=groups,dc=example,dc=com".to_string(),
        ])],
    )]));

    let store = Arc::new(MemoryStore::new());
    let default_group_id = store.seed_group(Group::new("Users"));
    let reconciler = reconciler(&store, default_group_id);

    let user = provider.authenticate("jdoe").await.unwrap();
    assert_eq!(user.groups, vec!["sales".to_string()]);

    let account = reconciler.materialize(&user).await.unwrap();
    assert_eq!(account.username, "jdoe");
    assert_eq!(account.email, Some("jdoe@example.com".to_string()));

    let access = SystemAccess::acquire();
    let group_ids = store.groups_of_account(&access, account.id).await.unwrap();
    assert_eq!(group_ids.len(), 1);
    let group = store.get_by_id(group_ids[0]).await.unwrap().unwrap();
    assert_eq!(group.name, "Sales");
    assert_eq!(group.parent_id, Some(default_group_id));
}

#[tokio::test]
async fn login_without_memberships_lands_in_default_group() {
    let provider = provider(HashMap::from([(
        BASE_DN.to_string(),
        vec![jdoe_entry(Vec::new())],
    )]));

    let store = Arc::new(MemoryStore::new());
    let default_group_id = store.seed_group(Group::new("Users"));
    let reconciler = reconciler(&store, default_group_id);

    let user = provider.authenticate("jdoe").await.unwrap();
    assert!(user.groups.is_empty());

    let account = reconciler.materialize(&user).await.unwrap();
    let access = SystemAccess::acquire();
    let group_ids = store.groups_of_account(&access, account.id).await.unwrap();
    assert_eq!(group_ids, vec![default_group_id]);
}

#[tokio::test]
async fn repeated_login_is_idempotent() {
    let provider = provider(HashMap::from([(
        BASE_DN.to_string(),
        vec![jdoe_entry(vec![
            "cn=Sales,ou=groups,dc=example,dc=com".to_string(),
        ])],
    )]));

    let store = Arc::new(MemoryStore::new());
    let default_group_id = store.seed_group(Group::new("Users"));
    let reconciler = reconciler(&store, default_group_id);

    let user = provider.authenticate("jdoe").await.unwrap();
    let first = reconciler.materialize(&user).await.unwrap();

    let user = provider.authenticate("jdoe").await.unwrap();
    let second = reconciler.materialize(&user).await.unwrap();

    assert_eq!(first.id, second.id);
    let access = SystemAccess::acquire();
    let group_ids = store.groups_of_account(&access, first.id).await.unwrap();
    assert_eq!(group_ids.len(), 1);
}

#[tokio::test]
async fn membership_changes_in_directory_are_applied_on_next_login() {
    let store = Arc::new(MemoryStore::new());
    let default_group_id = store.seed_group(Group::new("Users"));
    let sales_id = store.seed_group(Group::new("Sales"));
    let support_id = store.seed_group(Group::new("Support"));
    let reconciler = reconciler(&store, default_group_id);

    // First login: member of Sales only.
    let provider_before = provider(HashMap::from([(
        BASE_DN.to_string(),
        vec![jdoe_entry(vec![
            "cn=Sales,ou=groups,dc=example,dc=com".to_string(),
        ])],
    )]));
    let user = provider_before.authenticate("jdoe").await.unwrap();
    let account = reconciler.materialize(&user).await.unwrap();

    // Directory moves the user from Sales to Support.
    let provider_after = provider(HashMap::from([(
        BASE_DN.to_string(),
        vec![jdoe_entry(vec![
            "cn=Support,ou=groups,dc=example,dc=com".to_string(),
        ])],
    )]));
    let user = provider_after.authenticate("jdoe").await.unwrap();
    let account_again = reconciler.materialize(&user).await.unwrap();
    assert_eq!(account.id, account_again.id);

    let access = SystemAccess::acquire();
    let current: HashSet<Uuid> = store
        .groups_of_account(&access, account.id)
        .await
        .unwrap()
        .into_iter()
        .collect();
    assert!(current.contains(&support_id));
    assert!(!current.contains(&sales_id));
    assert_eq!(current.len(), 1);
}

#[tokio::test]
async fn unknown_user_never_reaches_the_store() {
    let provider = provider(HashMap::new());

    let err = provider.authenticate("ghost").await.unwrap_err();
    assert!(err.is_user_not_found());
}
