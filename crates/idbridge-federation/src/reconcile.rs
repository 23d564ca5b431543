//! Account and group reconciliation.
//!
//! Runs after a successful directory authentication: finds or creates
//! the account matching the federated user and makes its group
//! memberships equal to the directory-resolved set.

use std::collections::{HashMap, HashSet};

use idbridge_model::{Account, FederatedUser, Group};
use idbridge_storage::{
    AccountCreateRequest, AccountProvider, GroupCreateRequest, GroupProvider, SystemAccess,
};
use uuid::Uuid;

use crate::credential::initial_credential;
use crate::error::FederationResult;

/// Static configuration for the reconciler.
///
/// All fields are required; there are no runtime fallbacks for an
/// unconfigured owner or parent group.
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Administrative account that owns created accounts.
    pub admin_account_id: Uuid,
    /// Parent group for created groups, and the membership fallback for
    /// logins that resolved no groups at all.
    pub default_group_id: Uuid,
}

impl ReconcilerConfig {
    /// Creates a reconciler configuration.
    #[must_use]
    pub const fn new(admin_account_id: Uuid, default_group_id: Uuid) -> Self {
        Self {
            admin_account_id,
            default_group_id,
        }
    }
}

/// Reconciles federated users against the identity store.
///
/// Stateless besides its configuration; one instance serves concurrent
/// logins. Concurrent creation of the same new account or group is left
/// to the store's own uniqueness rules and surfaces as a
/// `StorageError::Duplicate` for the losing attempt.
pub struct IdentityReconciler<A, G> {
    accounts: A,
    groups: G,
    config: ReconcilerConfig,
}

impl<A, G> IdentityReconciler<A, G>
where
    A: AccountProvider,
    G: GroupProvider,
{
    /// Creates a new reconciler over the given store providers.
    pub const fn new(accounts: A, groups: G, config: ReconcilerConfig) -> Self {
        Self {
            accounts,
            groups,
            config,
        }
    }

    /// Finds or creates the account for a federated user and reconciles
    /// its group memberships.
    ///
    /// On the existing-account path only memberships change: groups in
    /// the resolved set but not current are assigned, stale ones are
    /// unassigned, and the intersection is untouched. The account's own
    /// fields (email, attributes) are intentionally not refreshed; the
    /// directory is the source of truth at creation time only.
    ///
    /// ## Errors
    ///
    /// Store failures propagate unrecovered, since stopping halfway is
    /// safer than masking a partially applied membership set.
    pub async fn materialize(&self, user: &FederatedUser) -> FederationResult<Account> {
        let access = SystemAccess::acquire();
        let resolved = self.resolve_or_create_groups(&access, &user.groups).await?;

        if let Some(account) = self.accounts.get_by_username(&user.username).await? {
            let current: HashSet<Uuid> = self
                .accounts
                .groups_of_account(&access, account.id)
                .await?
                .into_iter()
                .collect();
            let target: HashSet<Uuid> = resolved.keys().copied().collect();

            for group_id in target.difference(&current) {
                tracing::debug!(username = %user.username, %group_id, "assigning account to group");
                self.accounts
                    .assign_to_group(&access, account.id, *group_id)
                    .await?;
            }
            for group_id in current.difference(&target) {
                tracing::debug!(username = %user.username, %group_id, "unassigning account from stale group");
                self.accounts
                    .unassign_from_group(&access, account.id, *group_id)
                    .await?;
            }

            return Ok(account);
        }

        // No account membership may be empty; fall back to the default
        // parent group when the directory resolved nothing.
        let group_ids: Vec<Uuid> = if resolved.is_empty() {
            vec![self.config.default_group_id]
        } else {
            resolved.keys().copied().collect()
        };

        let mut request = AccountCreateRequest::new(
            &user.username,
            initial_credential(),
            self.config.admin_account_id,
        )
        .with_attributes(user.attributes.clone());
        request.email = user.email.clone();

        tracing::debug!(username = %user.username, groups = group_ids.len(), "creating account");
        let account = self.accounts.create(&access, request, &group_ids).await?;
        Ok(account)
    }

    /// Resolves group names against the store, creating missing groups.
    ///
    /// Existing groups are matched case-insensitively using the Unicode
    /// simple lowercase mapping (locale-independent). Names with no
    /// match are created with the first character upper-cased, under
    /// the configured default parent group.
    pub async fn resolve_or_create_groups(
        &self,
        access: &SystemAccess,
        names: &[String],
    ) -> FederationResult<HashMap<Uuid, Group>> {
        if names.is_empty() {
            return Ok(HashMap::new());
        }

        let found = self.groups.find_by_names(access, names).await?;

        let mut result: HashMap<Uuid, Group> =
            found.into_iter().map(|group| (group.id, group)).collect();
        let mut known: HashSet<String> = result
            .values()
            .map(|group| group.name.to_lowercase())
            .collect();

        for name in names {
            let folded = name.to_lowercase();
            if known.contains(&folded) {
                continue;
            }
            tracing::debug!(group = %name, "creating missing group");
            let created = self
                .groups
                .create(
                    access,
                    GroupCreateRequest::under_parent(
                        capitalize_first(name),
                        self.config.default_group_id,
                    ),
                )
                .await?;
            known.insert(folded);
            result.insert(created.id, created);
        }

        Ok(result)
    }
}

/// Upper-cases the first character of a name, leaving the rest as-is.
fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
