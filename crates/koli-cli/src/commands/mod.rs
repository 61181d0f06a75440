//! CLI commands module
//!
//! Contains all CLI command implementations.

pub mod accounts;
pub mod auth;
pub mod config;
pub mod helpers;
pub mod inventory;
pub mod koli;
pub mod orders;

use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use koli_core::storage::{KeyringSecureStore, MemoryStore, SecureStore, SqliteKeyValueStore};
use koli_core::{ApiClient, ClientConfig, CredentialStore, Credentials, Database, SessionManager};

use crate::output::Output;

/// Where the session token is kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TokenStore {
    /// Platform secret store (Keychain, Credential Manager, kernel keyring)
    #[default]
    Keychain,
    /// Owner-only file next to the database, for hosts without a secret store
    File,
}

/// Shared context for all commands
pub struct Context {
    pub db: Database,
    pub out: Output,
    pub credentials: Arc<CredentialStore>,
    pub api: Arc<ApiClient>,
    pub session: SessionManager,
}

impl Context {
    /// Wire storage, credential store, API client and session together and
    /// restore any persisted session.
    pub async fn new(db: Database, out: Output, token_store: TokenStore) -> Result<Self> {
        let kv = Arc::new(SqliteKeyValueStore::new(db.clone()));
        let secure: Arc<dyn SecureStore> = match (db.path(), token_store) {
            (Some(path), TokenStore::Keychain) => Arc::new(KeyringSecureStore::keychain(path)?),
            (Some(path), TokenStore::File) => Arc::new(KeyringSecureStore::file_beside(path)),
            (None, _) => Arc::new(MemoryStore::new()),
        };

        let credentials = Arc::new(CredentialStore::init(kv.clone()));
        let api = Arc::new(ApiClient::with_http(
            credentials.clone(),
            ClientConfig::from_env(),
        )?);
        let session = SessionManager::new(api.clone(), kv, secure);
        let restored = session.restore().await;
        log::debug!("[cli] Session restored: {} (token store: {:?})", restored, token_store);

        Ok(Self {
            db,
            out,
            credentials,
            api,
            session,
        })
    }

    /// Credentials of the logged-in user
    pub async fn require_credentials(&self) -> Result<Credentials> {
        let credentials = match self.session.is_authenticated().await {
            true => self.session.credentials().await,
            false => None,
        };
        credentials.ok_or_else(|| anyhow!("Not logged in. Run 'koli login --user <code>' first."))
    }
}
