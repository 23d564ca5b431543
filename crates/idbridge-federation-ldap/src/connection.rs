//! Directory client interface and its `ldap3` implementation.
//!
//! The authentication pipeline is generic over [`DirectoryClient`] so
//! tests can script a directory; production uses
//! [`LdapDirectoryClient`], which drives a real connection.

use async_trait::async_trait;
use ldap3::{Ldap, LdapConnAsync, LdapConnSettings, SearchEntry};
use tokio::sync::Mutex;

use crate::config::LdapConfig;
use crate::error::{LdapError, LdapResult};
use crate::search::{DirectoryEntry, SearchScope};

/// Client-side view of the directory service.
///
/// Binds and searches are blocking network calls from the caller's
/// perspective; timeouts and cancellation are the caller's concern.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Binds to the directory with the given credentials.
    async fn bind(&self, dn: &str, password: &str) -> LdapResult<()>;

    /// Executes a search, returning entries in server order.
    async fn search(
        &self,
        base_dn: &str,
        scope: SearchScope,
        filter: &str,
        attributes: &[String],
    ) -> LdapResult<Vec<DirectoryEntry>>;
}

/// `ldap3`-backed directory client.
///
/// Holds at most one live connection; a bind after a connection loss
/// reconnects transparently.
pub struct LdapDirectoryClient {
    connection_url: String,
    settings: LdapConnSettings,
    handle: Mutex<Option<Ldap>>,
}

impl LdapDirectoryClient {
    /// Creates a client for the configured directory.
    #[must_use]
    pub fn new(config: &LdapConfig) -> Self {
        Self {
            connection_url: config.connection_url.clone(),
            settings: LdapConnSettings::new().set_conn_timeout(config.connection_timeout),
            handle: Mutex::new(None),
        }
    }

    async fn connect(&self) -> LdapResult<Ldap> {
        let (conn, ldap) =
            LdapConnAsync::with_settings(self.settings.clone(), &self.connection_url)
                .await
                .map_err(|err| LdapError::Connection(err.to_string()))?;

        tokio::spawn(async move {
            if let Err(err) = conn.drive().await {
                tracing::warn!(error = %err, "LDAP connection driver error");
            }
        });

        Ok(ldap)
    }
}

#[async_trait]
impl DirectoryClient for LdapDirectoryClient {
    async fn bind(&self, dn: &str, password: &str) -> LdapResult<()> {
        let mut guard = self.handle.lock().await;
        let ldap = match guard.as_mut() {
            Some(ldap) => ldap,
            None => {
                let ldap = self.connect().await?;
                guard.insert(ldap)
            }
        };

        match ldap.simple_bind(dn, password).await {
            Ok(result) => {
                result
                    .success()
                    .map_err(|err| LdapError::Bind(format!("bind as '{dn}' failed: {err}")))?;
                Ok(())
            }
            Err(err) => {
                // The connection is unusable after a transport error.
                guard.take();
                Err(LdapError::Bind(err.to_string()))
            }
        }
    }

    async fn search(
        &self,
        base_dn: &str,
        scope: SearchScope,
        filter: &str,
        attributes: &[String],
    ) -> LdapResult<Vec<DirectoryEntry>> {
        let mut guard = self.handle.lock().await;
        let ldap = guard
            .as_mut()
            .ok_or_else(|| LdapError::connection("not bound to the directory"))?;

        let (results, _response) = ldap
            .search(base_dn, scope.to_ldap3(), filter, attributes.to_vec())
            .await
            .map_err(|err| LdapError::Search(err.to_string()))?
            .success()
            .map_err(|err| LdapError::Search(format!("search under '{base_dn}' failed: {err}")))?;

        Ok(results
            .into_iter()
            .map(SearchEntry::construct)
            .map(DirectoryEntry::from_search_entry)
            .collect())
    }
}
