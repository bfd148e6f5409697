//! SQLite-backed key-value store.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use crate::store::{KeyValueStore, StorageError};

/// Key-value store persisted in a single SQLite table.
///
/// `SqlitePool` is `Send + Sync` and cheap to clone, so handles can be shared
/// freely.
#[derive(Debug, Clone)]
pub struct SqliteKeyValueStore {
    pool: SqlitePool,
}

impl SqliteKeyValueStore {
    /// Open (creating if needed) the database file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create storage directory at {:?}", parent))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .with_context(|| format!("failed to open SQLite store at {:?}", path))?;

        Self::with_pool(pool).await
    }

    /// Open the store at the platform default location
    /// (`{data_dir}/storefront/cart.db`).
    pub async fn open_default() -> anyhow::Result<Self> {
        let path = default_db_path()?;
        tracing::info!(path = %path.display(), "opening default cart store");
        Self::open(path).await
    }

    /// A private in-memory database. Gone when the store is dropped.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .context("invalid in-memory SQLite URL")?;

        // Every connection to `:memory:` is its own database, so pin the pool
        // to a single connection that never expires.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("failed to open in-memory SQLite store")?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> anyhow::Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS key_values (
                key        TEXT PRIMARY KEY NOT NULL,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create key_values table")?;

        Ok(Self { pool })
    }

    async fn read(&self, key: &str) -> anyhow::Result<Option<String>> {
        let row = sqlx::query(
            r#"
            SELECT value
            FROM key_values
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .context("failed to read key from store")?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn write(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO key_values (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key)
            DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await
        .context("failed to upsert key in store")?;

        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for SqliteKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.read(key).await.map_err(|err| {
            tracing::error!("failed to read {key:?} from SQLite store: {err:?}");
            StorageError::Backend(format!("{err:#}"))
        })
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.write(key, value).await.map_err(|err| {
            tracing::error!("failed to write {key:?} to SQLite store: {err:?}");
            StorageError::Backend(format!("{err:#}"))
        })
    }
}

/// Resolve the path to the SQLite cart database:
/// `{app_data_dir}/storefront/cart.db`.
pub fn default_db_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    let mut path = base;
    path.push("storefront");
    path.push("cart.db");

    Ok(path)
}
