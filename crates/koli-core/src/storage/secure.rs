//! Session token storage on top of `keyring`
//!
//! The token lives in the platform secret store:
//!
//! * **macOS:** Keychain
//! * **Windows:** Credential Manager
//! * **Linux:** the kernel keyutils session keyring
//!
//! Where no secret store is reachable (headless servers, containers), the
//! token can be kept in an owner-only file next to the settings database
//! instead. Both back ends sit behind the same [`keyring::Entry`], so the
//! session manager never knows which one it talks to.

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use keyring::credential::CredentialApi;
use keyring::Entry;

use super::SecureStore;
use crate::error::Result;

/// Keyring service every koli entry is filed under
pub const KEYRING_SERVICE: &str = "koli";

/// File name of the token when kept on disk
pub const TOKEN_FILE_NAME: &str = "auth_token";

/// Keeps the session token in a single keyring entry.
pub struct KeyringSecureStore {
    entry: Entry,
}

impl KeyringSecureStore {
    /// Entry in the platform secret store. The account name ties the token
    /// to one settings database.
    pub fn keychain(db_path: &Path) -> Result<Self> {
        let account = format!("{}@{}", TOKEN_FILE_NAME, db_path.display());
        let entry = Entry::new(KEYRING_SERVICE, &account)?;
        Ok(Self { entry })
    }

    /// Owner-only token file next to the given database file
    pub fn file_beside(db_path: &Path) -> Self {
        let dir = db_path.parent().unwrap_or_else(|| Path::new("."));
        Self::file(dir.join(TOKEN_FILE_NAME))
    }

    pub fn file(path: PathBuf) -> Self {
        Self {
            entry: Entry::new_with_credential(Box::new(FileCredential::new(path))),
        }
    }

    /// In-process entry; nothing outlives the store.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn mock() -> Result<Self> {
        use keyring::credential::CredentialBuilderApi;

        let credential =
            keyring::mock::MockCredentialBuilder {}.build(None, KEYRING_SERVICE, TOKEN_FILE_NAME)?;
        Ok(Self {
            entry: Entry::new_with_credential(credential),
        })
    }
}

#[async_trait]
impl SecureStore for KeyringSecureStore {
    async fn get_token(&self) -> Result<Option<String>> {
        match self.entry.get_password() {
            Ok(token) => {
                let token = token.trim().to_string();
                Ok((!token.is_empty()).then_some(token))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set_token(&self, token: &str) -> Result<()> {
        self.entry.set_password(token)?;
        Ok(())
    }

    async fn remove_token(&self) -> Result<()> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Keyring credential backed by a plain file, readable only by its owner on Unix.
#[derive(Debug)]
struct FileCredential {
    path: PathBuf,
}

impl FileCredential {
    fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

fn io_err_to_keyring_err(err: io::Error) -> keyring::Error {
    match err.kind() {
        io::ErrorKind::NotFound => keyring::Error::NoEntry,
        io::ErrorKind::PermissionDenied => keyring::Error::NoStorageAccess(err.into()),
        _ => keyring::Error::PlatformFailure(err.into()),
    }
}

impl CredentialApi for FileCredential {
    fn set_secret(&self, secret: &[u8]) -> keyring::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err_to_keyring_err)?;
        }

        let mut opts = std::fs::OpenOptions::new();
        opts.write(true).create(true).truncate(true);

        // rw------- (owner r/w only)
        #[cfg(unix)]
        opts.mode(0o600);

        opts.open(&self.path)
            .and_then(|mut file| file.write_all(secret))
            .map_err(io_err_to_keyring_err)
    }

    fn get_secret(&self) -> keyring::Result<Vec<u8>> {
        std::fs::read(&self.path).map_err(io_err_to_keyring_err)
    }

    fn delete_credential(&self) -> keyring::Result<()> {
        std::fs::remove_file(&self.path).map_err(io_err_to_keyring_err)
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn check_token_lifecycle(store: &KeyringSecureStore) {
        assert_eq!(store.get_token().await.unwrap(), None);

        store.set_token("abc").await.unwrap();
        assert_eq!(store.get_token().await.unwrap().as_deref(), Some("abc"));

        store.set_token("def").await.unwrap();
        assert_eq!(store.get_token().await.unwrap().as_deref(), Some("def"));

        store.remove_token().await.unwrap();
        assert_eq!(store.get_token().await.unwrap(), None);

        // Second removal is a no-op
        store.remove_token().await.unwrap();
    }

    #[tokio::test]
    async fn test_mock_keyring_lifecycle() {
        let store = KeyringSecureStore::mock().unwrap();
        check_token_lifecycle(&store).await;
    }

    #[tokio::test]
    async fn test_file_lifecycle() {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyringSecureStore::file_beside(&temp_dir.path().join("koli.db"));
        check_token_lifecycle(&store).await;
    }

    #[tokio::test]
    async fn test_file_survives_a_new_store() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("koli.db");

        KeyringSecureStore::file_beside(&db_path)
            .set_token("abc")
            .await
            .unwrap();

        let reopened = KeyringSecureStore::file_beside(&db_path);
        assert_eq!(reopened.get_token().await.unwrap().as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_blank_token_file_counts_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(TOKEN_FILE_NAME);
        std::fs::write(&path, "  \n").unwrap();

        let store = KeyringSecureStore::file(path);
        assert_eq!(store.get_token().await.unwrap(), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(TOKEN_FILE_NAME);
        let store = KeyringSecureStore::file(path.clone());
        store.set_token("secret").await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_missing_file_maps_to_no_entry() {
        let err = io_err_to_keyring_err(io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, keyring::Error::NoEntry));
    }
}
