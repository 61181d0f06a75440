//! SQLite-backed key/value store on the `settings` table

use async_trait::async_trait;
use chrono::Utc;

use super::KeyValueStore;
use crate::db::Database;
use crate::error::Result;

pub struct SqliteKeyValueStore {
    db: Database,
}

impl SqliteKeyValueStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.db.pool)
            .await?;

        Ok(row.map(|(value,)| value))
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.db.pool)
        .await?;

        log::debug!("[storage] Saved setting {}", key);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM settings WHERE key = ?")
            .bind(key)
            .execute(&self.db.pool)
            .await?;

        log::debug!(
            "[storage] Removed setting {} ({} rows)",
            key,
            result.rows_affected()
        );
        Ok(())
    }
}
