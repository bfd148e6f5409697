use thiserror::Error;

use storefront_catalog::CatalogError;
use storefront_core::{DomainError, ProductId};
use storefront_storage::StorageError;

/// Notification shown when a requested quantity exceeds stock.
pub const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity is out of stock";

/// Why a cart operation did not go through.
///
/// All kinds are terminal for the call that raised them; nothing retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    #[error("product {product_id}: requested {requested}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    #[error("product {0} is not in the cart")]
    ItemNotFound(ProductId),

    /// Anything else: catalog unreachable, malformed response, storage failure.
    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl CartError {
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self::Unexpected(msg.into())
    }

    /// Translate a cart rule violation for `product_id`.
    pub fn from_domain(err: DomainError, product_id: ProductId) -> Self {
        match err {
            DomainError::InsufficientStock {
                requested,
                available,
            } => Self::OutOfStock {
                product_id,
                requested,
                available,
            },
            DomainError::NotFound => Self::ItemNotFound(product_id),
            other => Self::Unexpected(other.to_string()),
        }
    }

    /// The text the user sees when `operation` fails with this error.
    pub fn user_message(&self, operation: CartOperation) -> &'static str {
        match self {
            Self::OutOfStock { .. } => OUT_OF_STOCK_MESSAGE,
            Self::ItemNotFound(_) | Self::Unexpected(_) => operation.failure_message(),
        }
    }
}

impl From<CatalogError> for CartError {
    fn from(err: CatalogError) -> Self {
        Self::Unexpected(err.to_string())
    }
}

impl From<StorageError> for CartError {
    fn from(err: StorageError) -> Self {
        Self::Unexpected(err.to_string())
    }
}

/// The three mutating operations, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

impl CartOperation {
    pub fn failure_message(self) -> &'static str {
        match self {
            CartOperation::Add => "Failed to add product",
            CartOperation::Remove => "Failed to remove product",
            CartOperation::UpdateAmount => "Failed to update product quantity",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CartOperation::Add => "add_product",
            CartOperation::Remove => "remove_product",
            CartOperation::UpdateAmount => "update_product_amount",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_cart_errors() {
        let id = ProductId::new(4);

        assert_eq!(
            CartError::from_domain(DomainError::insufficient_stock(3, 2), id),
            CartError::OutOfStock {
                product_id: id,
                requested: 3,
                available: 2
            }
        );
        assert_eq!(
            CartError::from_domain(DomainError::not_found(), id),
            CartError::ItemNotFound(id)
        );
        assert!(matches!(
            CartError::from_domain(DomainError::validation("bad"), id),
            CartError::Unexpected(_)
        ));
    }

    #[test]
    fn out_of_stock_message_wins_over_operation_message() {
        let err = CartError::OutOfStock {
            product_id: ProductId::new(1),
            requested: 2,
            available: 1,
        };
        assert_eq!(err.user_message(CartOperation::Add), OUT_OF_STOCK_MESSAGE);
        assert_eq!(err.user_message(CartOperation::UpdateAmount), OUT_OF_STOCK_MESSAGE);

        let err = CartError::ItemNotFound(ProductId::new(1));
        assert_eq!(err.user_message(CartOperation::Remove), "Failed to remove product");
        assert_eq!(
            CartError::unexpected("boom").user_message(CartOperation::Add),
            "Failed to add product"
        );
    }

    #[test]
    fn infrastructure_errors_are_unexpected() {
        let err: CartError = CatalogError::Network("refused".into()).into();
        assert!(matches!(err, CartError::Unexpected(msg) if msg.contains("refused")));

        let err: CartError = StorageError::Poisoned.into();
        assert!(matches!(err, CartError::Unexpected(_)));
    }
}
