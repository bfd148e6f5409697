//! Runtime configuration, from flags or environment.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;

use storefront_catalog::{Catalog, HttpCatalog};
use storefront_storage::{KeyValueStore, SqliteKeyValueStore};
use storefront_store::CART_STORAGE_KEY;

#[derive(Debug, Clone, Args)]
pub struct CliConfig {
    /// Base URL of the catalog/stock API
    #[arg(long, env = "STOREFRONT_API_URL", default_value = "http://localhost:3333")]
    pub api_url: String,

    /// SQLite file holding the cart; defaults to the OS data directory
    #[arg(long, env = "STOREFRONT_CART_DB")]
    pub cart_db: Option<PathBuf>,

    /// Storage key the cart snapshot is kept under
    #[arg(long, env = "STOREFRONT_CART_KEY", default_value = CART_STORAGE_KEY)]
    pub cart_key: String,

    /// Give up on catalog requests after this many seconds
    #[arg(long, env = "STOREFRONT_HTTP_TIMEOUT_SECS")]
    pub http_timeout_secs: Option<u64>,

    /// Keep the cart in memory only (nothing is written to disk)
    #[arg(long, conflicts_with = "cart_db")]
    pub in_memory: bool,
}

impl CliConfig {
    pub fn catalog(&self) -> anyhow::Result<Arc<dyn Catalog>> {
        let catalog = match self.http_timeout_secs {
            Some(secs) => HttpCatalog::with_timeout(&self.api_url, Duration::from_secs(secs)),
            None => HttpCatalog::new(&self.api_url),
        }
        .with_context(|| format!("failed to build catalog client for {}", self.api_url))?;

        Ok(Arc::new(catalog))
    }

    pub async fn storage(&self) -> anyhow::Result<Arc<dyn KeyValueStore>> {
        let store = if self.in_memory {
            SqliteKeyValueStore::in_memory().await?
        } else if let Some(path) = &self.cart_db {
            SqliteKeyValueStore::open(path).await?
        } else {
            SqliteKeyValueStore::open_default().await?
        };

        Ok(Arc::new(store))
    }
}
