//! HTTP client for the catalog service.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use storefront_cart::ProductDetails;
use storefront_core::ProductId;

use crate::catalog::{Catalog, CatalogError, StockRecord};

/// Catalog backed by the storefront REST API.
///
/// - `GET {base_url}/stock/{id}` → `{ "amount": n }`
/// - `GET {base_url}/products/{id}` → product metadata
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>) -> Result<Self, CatalogError> {
        Self::build(base_url.into(), None)
    }

    /// Same as [`HttpCatalog::new`], but every request gives up after `timeout`.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        Self::build(base_url.into(), Some(timeout))
    }

    fn build(base_url: String, timeout: Option<Duration>) -> Result<Self, CatalogError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "catalog request");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(CatalogError::Api(
                resp.status().as_u16(),
                resp.text().await.unwrap_or_default(),
            ));
        }

        resp.json().await.map_err(|e| CatalogError::Parse(e.to_string()))
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, CatalogError> {
        self.get_json(&format!("/stock/{product_id}")).await
    }

    async fn product(&self, product_id: ProductId) -> Result<ProductDetails, CatalogError> {
        let details: ProductDetails = self.get_json(&format!("/products/{product_id}")).await?;
        if details.id != product_id {
            return Err(CatalogError::Parse(format!(
                "requested product {product_id}, catalog returned {}",
                details.id
            )));
        }
        Ok(details)
    }
}
