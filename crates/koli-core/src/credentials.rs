//! Credential store
//!
//! Single source of truth for the API base URL and the tenant-level company
//! secrets, with an in-process cache in front of the key/value storage.
//!
//! The cache lock is held across every storage round-trip in `set()` and
//! `reset()`, so once either returns, the next `get()` observes the new values.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::storage::{keys, KeyValueStore};

/// API base URL plus company secrets. Absent values are always `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApiSettings {
    pub api_base_url: String,
    pub company_code: String,
    pub company_password: String,
}

impl ApiSettings {
    pub fn has_base_url(&self) -> bool {
        !self.api_base_url.trim().is_empty()
    }
}

/// Partial update; only `Some` fields are written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiSettingsUpdate {
    pub url: Option<String>,
    pub company_code: Option<String>,
    pub company_password: Option<String>,
}

impl ApiSettingsUpdate {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn company_code(code: impl Into<String>) -> Self {
        Self {
            company_code: Some(code.into()),
            ..Self::default()
        }
    }

    pub fn company_password(password: impl Into<String>) -> Self {
        Self {
            company_password: Some(password.into()),
            ..Self::default()
        }
    }

    fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            (keys::API_BASE_URL, self.url.as_deref()),
            (keys::COMPANY_CODE, self.company_code.as_deref()),
            (keys::COMPANY_PASSWORD, self.company_password.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
    }
}

/// Trim a user-supplied base URL and check its scheme
pub fn validate_api_url(url: &str) -> Result<String> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::validation("URL is required"));
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(Error::validation("URL must start with http:// or https://"));
    }
    Ok(url.to_string())
}

pub struct CredentialStore {
    kv: Arc<dyn KeyValueStore>,
    cache: Mutex<Option<ApiSettings>>,
}

impl CredentialStore {
    /// Create a store over the given storage with a cold cache
    pub fn init(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            cache: Mutex::new(None),
        }
    }

    /// Current settings. Never fails: unreadable keys degrade to `""` and are
    /// retried on the next call instead of being cached.
    pub async fn get(&self) -> ApiSettings {
        let mut cache = self.cache.lock().await;
        if let Some(settings) = cache.as_ref() {
            return settings.clone();
        }

        let (settings, complete) = self.load().await;
        if complete {
            *cache = Some(settings.clone());
        }
        settings
    }

    /// Write the provided keys, then reload. Storage failures propagate.
    pub async fn set(&self, update: ApiSettingsUpdate) -> Result<ApiSettings> {
        let mut cache = self.cache.lock().await;
        // Dropped before writing so a half-applied update is never served from cache
        *cache = None;

        for (key, value) in update.entries() {
            self.kv.set_item(key, value).await?;
        }

        let (settings, complete) = self.load().await;
        if complete {
            *cache = Some(settings.clone());
        }

        log::info!(
            "[credentials] Settings saved (url set: {}, company code set: {})",
            update.url.is_some(),
            update.company_code.is_some()
        );
        Ok(settings)
    }

    /// Delete all persisted keys and clear the cache (first-run state)
    pub async fn reset(&self) -> Result<()> {
        let mut cache = self.cache.lock().await;
        *cache = None;

        for key in [keys::API_BASE_URL, keys::COMPANY_CODE, keys::COMPANY_PASSWORD] {
            self.kv.remove_item(key).await?;
        }

        log::info!("[credentials] Settings reset to defaults");
        Ok(())
    }

    async fn load(&self) -> (ApiSettings, bool) {
        let (api_base_url, url_ok) = self.read_or_empty(keys::API_BASE_URL).await;
        let (company_code, code_ok) = self.read_or_empty(keys::COMPANY_CODE).await;
        let (company_password, pwd_ok) = self.read_or_empty(keys::COMPANY_PASSWORD).await;

        let settings = ApiSettings {
            api_base_url,
            company_code,
            company_password,
        };
        (settings, url_ok && code_ok && pwd_ok)
    }

    async fn read_or_empty(&self, key: &str) -> (String, bool) {
        match self.kv.get_item(key).await {
            Ok(value) => (value.unwrap_or_default(), true),
            Err(e) => {
                log::error!("[credentials] Failed to load {} from storage: {}", key, e);
                (String::new(), false)
            }
        }
    }
}
