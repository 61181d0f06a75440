//! Storage primitives
//!
//! Two seams sit under the credential store and the session manager:
//!
//! ```text
//! ┌──────────────────────────────┐   ┌──────────────────────────────┐
//! │ trait KeyValueStore          │   │ trait SecureStore            │
//! │   api_base_url, company_*,   │   │   auth_token                 │
//! │   auth_user (JSON)           │   │                              │
//! └──────────────────────────────┘   └──────────────────────────────┘
//!      │               │                  │               │
//!      ▼               ▼                  ▼               ▼
//! SqliteKeyValueStore  MemoryStore  KeyringSecureStore  MemoryStore
//!                                    (keychain | file)
//! ```

pub mod memory;
pub mod secure;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::Result;

pub use memory::MemoryStore;
pub use secure::KeyringSecureStore;
pub use sqlite::SqliteKeyValueStore;

/// Keys under which settings are persisted
pub mod keys {
    pub const API_BASE_URL: &str = "api_base_url";
    pub const COMPANY_CODE: &str = "company_code";
    pub const COMPANY_PASSWORD: &str = "company_password";
    pub const AUTH_USER: &str = "auth_user";
}

/// Persistent string key/value storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never written
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Insert or overwrite a value
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; deleting a missing key is not an error
    async fn remove_item(&self, key: &str) -> Result<()>;
}

/// Storage for the session token
#[async_trait]
pub trait SecureStore: Send + Sync {
    async fn get_token(&self) -> Result<Option<String>>;

    async fn set_token(&self, token: &str) -> Result<()>;

    /// Remove the token; removing when absent is not an error
    async fn remove_token(&self) -> Result<()>;
}
