//! # koli-core
//!
//! Core logic for the Koli warehouse client - shared by every front end.
//!
//! This crate provides:
//! - Settings and token storage (`storage`, `db` modules)
//! - The credential store for API URL and company secrets (`credentials` module)
//! - The remote call layer and scan flow (`services` module)
//! - Session lifecycle (`auth` module)
//! - Client-side search and paging (`listing` module)
//! - Unified error handling (`error` module)

pub mod auth;
pub mod config;
pub mod credentials;
pub mod db;
pub mod error;
pub mod listing;
pub mod models;
pub mod services;
pub mod storage;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;
pub mod utils;

// Re-exports for convenience
pub use db::Database;
pub use error::{ApiError, Error, Result};

pub use auth::{LoginOutcome, Route, SessionManager, SessionPhase};
pub use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_LICENSE_KEY};
pub use credentials::{validate_api_url, ApiSettings, ApiSettingsUpdate, CredentialStore};
pub use listing::{filter_items, Paginator, Searchable, PAGE_SIZE};

// Re-export commonly used types from models
pub use models::{
    BarcodeLookup, Credentials, CurrentAccount, InventoryItem, KoliDetailItem, KoliItem,
    LoginResponse, OrderReceipt, TaskOutcome, User,
};

// Re-export commonly used types from services
pub use services::{
    open_koli_by_barcode, ApiClient, HttpTransport, RawResponse, ScanOutcome, Transport,
};
pub use storage::{KeyValueStore, KeyringSecureStore, MemoryStore, SecureStore, SqliteKeyValueStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_version_format() {
        let v = version();
        // Should be semver format: x.y.z
        let parts: Vec<&str> = v.split('.').collect();
        assert_eq!(parts.len(), 3, "Version should be in x.y.z format");
    }
}
