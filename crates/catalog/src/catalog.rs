use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use storefront_cart::ProductDetails;
use storefront_core::ProductId;

/// Availability of a product (`GET /stock/{id}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub amount: u32,
}

impl StockRecord {
    pub fn new(id: ProductId, amount: u32) -> Self {
        Self {
            id: Some(id),
            amount,
        }
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("product {0} not found in catalog")]
    NotFound(ProductId),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

/// Read-only access to stock levels and product metadata.
///
/// One request per call, no retries. Callers decide what a failure means.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Current stock for `product_id`.
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, CatalogError>;

    /// Product metadata for `product_id`.
    async fn product(&self, product_id: ProductId) -> Result<ProductDetails, CatalogError>;
}

#[async_trait]
impl<C> Catalog for Arc<C>
where
    C: Catalog + ?Sized,
{
    async fn stock(&self, product_id: ProductId) -> Result<StockRecord, CatalogError> {
        (**self).stock(product_id).await
    }

    async fn product(&self, product_id: ProductId) -> Result<ProductDetails, CatalogError> {
        (**self).product(product_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_record_accepts_bare_amount() {
        let record: StockRecord = serde_json::from_str(r#"{"amount": 4}"#).unwrap();
        assert_eq!(record.amount, 4);
        assert_eq!(record.id, None);

        let record: StockRecord = serde_json::from_str(r#"{"id": 2, "amount": 0}"#).unwrap();
        assert_eq!(record, StockRecord::new(ProductId::new(2), 0));
    }

    #[test]
    fn negative_stock_does_not_parse() {
        assert!(serde_json::from_str::<StockRecord>(r#"{"amount": -1}"#).is_err());
    }
}
