//! In-memory catalog for tests/dev.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use storefront_cart::ProductDetails;
use storefront_core::ProductId;

use crate::catalog::{Catalog, CatalogError, StockRecord};

#[derive(Debug, Default)]
struct State {
    products: HashMap<ProductId, ProductDetails>,
    stock: HashMap<ProductId, u32>,
    offline: bool,
    stock_calls: HashMap<ProductId, usize>,
    product_calls: HashMap<ProductId, usize>,
}

/// In-memory catalog.
///
/// Counts the requests it serves so tests can assert on side effects, and can
/// be switched "offline" to simulate an unreachable service.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: Mutex<State>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`InMemoryCatalog::insert_product`].
    pub fn with_product(self, details: ProductDetails, stock: u32) -> Self {
        self.insert_product(details, stock);
        self
    }

    pub fn insert_product(&self, details: ProductDetails, stock: u32) {
        if let Ok(mut state) = self.state.lock() {
            state.stock.insert(details.id, stock);
            state.products.insert(details.id, details);
        }
    }

    /// Set stock for a product, whether or not its metadata is known.
    pub fn set_stock(&self, product_id: ProductId, amount: u32) {
        if let Ok(mut state) = self.state.lock() {
            state.stock.insert(product_id, amount);
        }
    }

    /// While offline every request fails with [`CatalogError::Network`].
    pub fn set_offline(&self, offline: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.offline = offline;
        }
    }

    pub fn stock_calls(&self, product_id: ProductId) -> usize {
        self.state
            .lock()
            .map(|s| s.stock_calls.get(&product_id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn product_calls(&self, product_id: ProductId) -> usize {
        self.state
            .lock()
            .map(|s| s.product_calls.get(&product_id).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, CatalogError> {
        self.state
            .lock()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".to_string()))
    }
}

#[async_trait]
impl Catalog for InMemoryCatalog {
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, CatalogError> {
        let mut state = self.lock()?;
        *state.stock_calls.entry(product_id).or_default() += 1;

        if state.offline {
            return Err(CatalogError::Network("catalog offline".to_string()));
        }

        state
            .stock
            .get(&product_id)
            .map(|&amount| StockRecord::new(product_id, amount))
            .ok_or(CatalogError::NotFound(product_id))
    }

    async fn product(&self, product_id: ProductId) -> Result<ProductDetails, CatalogError> {
        let mut state = self.lock()?;
        *state.product_calls.entry(product_id).or_default() += 1;

        if state.offline {
            return Err(CatalogError::Network("catalog offline".to_string()));
        }

        state
            .products
            .get(&product_id)
            .cloned()
            .ok_or(CatalogError::NotFound(product_id))
    }
}
