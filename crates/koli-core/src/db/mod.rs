//! Database module - SQLx with SQLite
//!
//! Holds the persisted key/value settings (API base URL, company secrets,
//! the serialized user record).

use crate::error::{Error, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::PathBuf;

/// Database state
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
    path: Option<PathBuf>,
}

impl Database {
    /// Create a new database connection with default path
    pub async fn new() -> Result<Self> {
        let db_path = get_db_path()?;
        Self::open(db_path).await
    }

    /// Create a new database connection with a specific path
    pub async fn open(db_path: PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        log::info!("[db] Connecting to database: {}", db_path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        let db = Self {
            pool,
            path: Some(db_path),
        };
        db.run_migrations().await?;

        Ok(db)
    }

    /// In-memory database, gone when the pool is dropped
    pub async fn in_memory() -> Result<Self> {
        // A single connection so every query sees the same memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        let db = Self { pool, path: None };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Path of the database file, `None` for in-memory databases
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<()> {
        log::debug!("[db] Running database migrations...");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        log::debug!("[db] Database migrations completed");
        Ok(())
    }
}

/// Get database file path
/// Priority: KOLI_DB_PATH env var > default app data directory
pub fn get_db_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("KOLI_DB_PATH") {
        return Ok(PathBuf::from(path));
    }

    let dirs = directories::ProjectDirs::from("com", "koli", "Koli")
        .ok_or_else(|| Error::config("Could not determine project directories"))?;

    Ok(dirs.data_dir().join("koli.db"))
}
