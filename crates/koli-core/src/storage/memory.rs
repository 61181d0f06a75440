//! In-process storage, used for tests and throwaway sessions

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{KeyValueStore, SecureStore};
use crate::error::{Error, Result};

/// Implements both storage traits over a map.
///
/// Reads and writes can be made to fail on demand to exercise the
/// degraded paths of the credential store.
#[derive(Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
    token: Mutex<Option<String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store
    pub fn with_items<'a>(items: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = items
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            items: Mutex::new(map),
            ..Self::default()
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Whether no key/value item is stored
    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    fn check_read(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(Error::storage("simulated read failure"));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::storage("simulated write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.check_read()?;
        Ok(self.items.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.check_write()?;
        self.items
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        self.check_write()?;
        self.items.lock().await.remove(key);
        Ok(())
    }
}

#[async_trait]
impl SecureStore for MemoryStore {
    async fn get_token(&self) -> Result<Option<String>> {
        self.check_read()?;
        Ok(self.token.lock().await.clone())
    }

    async fn set_token(&self, token: &str) -> Result<()> {
        self.check_write()?;
        *self.token.lock().await = Some(token.to_string());
        Ok(())
    }

    async fn remove_token(&self) -> Result<()> {
        self.check_write()?;
        *self.token.lock().await = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_items_and_token_are_independent() {
        let store = MemoryStore::with_items([("company_code", "C1")]);
        store.set_token("t").await.unwrap();
        store.remove_item("company_code").await.unwrap();

        assert!(store.is_empty().await);
        assert_eq!(store.get_token().await.unwrap().as_deref(), Some("t"));
    }

    #[tokio::test]
    async fn test_simulated_failures() {
        let store = MemoryStore::new();
        store.set_fail_writes(true);
        assert!(store.set_item("k", "v").await.is_err());
        assert!(store.set_token("t").await.is_err());

        store.set_fail_writes(false);
        store.set_item("k", "v").await.unwrap();
        store.set_fail_reads(true);
        assert!(store.get_item("k").await.is_err());
    }
}
