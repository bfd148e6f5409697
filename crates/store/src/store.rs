use std::sync::{Arc, RwLock};

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use storefront_cart::{AddProduct, Cart, CartCommand, CartEvent, RemoveProduct, UpdateAmount};
use storefront_catalog::Catalog;
use storefront_core::ProductId;
use storefront_events::{Event, EventBus, InMemoryEventBus, Subscription};
use storefront_storage::KeyValueStore;

use crate::error::{CartError, CartOperation};
use crate::notifier::Notifier;

/// Storage key the cart snapshot lives under.
pub const CART_STORAGE_KEY: &str = "@storefront:cart";

/// Request payload for [`CartStore::update_product_amount`].
///
/// `amount` is signed because it usually comes straight from a quantity
/// input; zero and negative values are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Published to subscribers after every committed mutation.
#[derive(Debug, Clone)]
pub struct CartChange {
    pub event: CartEvent,
    /// The cart as committed, including this change.
    pub cart: Arc<Cart>,
}

/// Cart state holder.
///
/// - Reads (`cart()`, `total()`, ...) return the last committed snapshot and
///   never wait on in-flight mutations.
/// - Mutations run one at a time. Each one decides against the current
///   snapshot, persists the resulting cart, and only then swaps it in, so a
///   failure at any step leaves both memory and storage as they were.
/// - Every failure is reported once through the [`Notifier`] and returned.
///
/// Share between tasks with `Arc<CartStore>`.
pub struct CartStore {
    catalog: Arc<dyn Catalog>,
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    storage_key: String,
    cart: RwLock<Arc<Cart>>,
    mutation: Mutex<()>,
    changes: InMemoryEventBus<CartChange>,
}

impl core::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CartStore")
            .field("storage_key", &self.storage_key)
            .field("cart", &self.cart())
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Load the cart stored under [`CART_STORAGE_KEY`].
    pub async fn load(
        catalog: Arc<dyn Catalog>,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, CartError> {
        Self::load_with_key(catalog, storage, notifier, CART_STORAGE_KEY).await
    }

    /// Load the cart stored under `storage_key`.
    ///
    /// A missing snapshot yields an empty cart. So does a snapshot that
    /// cannot be parsed or that breaks the cart invariants; that case is
    /// logged and the bad value is left in place until the next write.
    /// Only a failing storage backend is an error.
    pub async fn load_with_key(
        catalog: Arc<dyn Catalog>,
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        storage_key: impl Into<String>,
    ) -> Result<Self, CartError> {
        let storage_key = storage_key.into();

        let cart = match storage.get(&storage_key).await? {
            None => Cart::new(),
            Some(raw) => match serde_json::from_str::<Cart>(&raw) {
                Ok(cart) => cart,
                Err(err) => {
                    tracing::warn!(key = %storage_key, "discarding unreadable cart snapshot: {err}");
                    Cart::new()
                }
            },
        };

        tracing::info!(key = %storage_key, lines = cart.cart_size(), "cart loaded");

        Ok(Self {
            catalog,
            storage,
            notifier,
            storage_key,
            cart: RwLock::new(Arc::new(cart)),
            mutation: Mutex::new(()),
            changes: InMemoryEventBus::new(),
        })
    }

    /// Last committed cart.
    pub fn cart(&self) -> Arc<Cart> {
        match self.cart.read() {
            Ok(cart) => Arc::clone(&cart),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Number of distinct products in the cart.
    pub fn cart_size(&self) -> usize {
        self.cart().cart_size()
    }

    pub fn total(&self) -> Decimal {
        self.cart().total()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Receive a [`CartChange`] for every mutation committed from now on.
    pub fn subscribe(&self) -> Subscription<CartChange> {
        self.changes.subscribe()
    }

    /// The current cart plus a subscription that starts exactly after it.
    ///
    /// Waits for an in-flight mutation to finish, so no change is missed or
    /// seen twice between the snapshot and the first message.
    pub async fn watch(&self) -> (Arc<Cart>, Subscription<CartChange>) {
        let _guard = self.mutation.lock().await;
        (self.cart(), self.changes.subscribe())
    }

    /// Add one unit of `product_id`.
    ///
    /// A product already in the cart goes up by one; a new product is
    /// appended with amount 1 using metadata fetched from the catalog. Either
    /// way the new amount must not exceed current stock.
    pub async fn add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let result = self.try_add_product(product_id).await;
        self.report(CartOperation::Add, product_id, result)
    }

    /// Remove the line for `product_id`.
    pub async fn remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let result = self.try_remove_product(product_id).await;
        self.report(CartOperation::Remove, product_id, result)
    }

    /// Set the amount of a product already in the cart.
    ///
    /// Amounts of zero or below are ignored: the call succeeds without
    /// touching the catalog, the cart, or storage.
    pub async fn update_product_amount(&self, request: UpdateProductAmount) -> Result<(), CartError> {
        if request.amount <= 0 {
            tracing::debug!(
                product_id = %request.product_id,
                amount = request.amount,
                "ignoring non-positive amount update"
            );
            return Ok(());
        }

        let result = self.try_update_product_amount(request).await;
        self.report(CartOperation::UpdateAmount, request.product_id, result)
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let _guard = self.mutation.lock().await;
        let current = self.cart();

        let stock = self.catalog.stock(product_id).await?;

        // Metadata is only needed for a new line, and only worth fetching
        // when there is stock for it.
        let details = if !current.contains(product_id) && stock.amount >= 1 {
            Some(self.catalog.product(product_id).await?)
        } else {
            None
        };

        let command = CartCommand::AddProduct(AddProduct {
            product_id,
            details,
            stock: stock.amount,
            occurred_at: Utc::now(),
        });

        self.commit(&current, &command, product_id).await
    }

    async fn try_remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let _guard = self.mutation.lock().await;
        let current = self.cart();

        let command = CartCommand::RemoveProduct(RemoveProduct {
            product_id,
            occurred_at: Utc::now(),
        });

        self.commit(&current, &command, product_id).await
    }

    async fn try_update_product_amount(&self, request: UpdateProductAmount) -> Result<(), CartError> {
        let _guard = self.mutation.lock().await;
        let current = self.cart();

        let stock = self.catalog.stock(request.product_id).await?;

        // Anything beyond u32 is beyond any stock level anyway.
        let amount = u32::try_from(request.amount).unwrap_or(u32::MAX);

        let command = CartCommand::UpdateAmount(UpdateAmount {
            product_id: request.product_id,
            amount,
            stock: stock.amount,
            occurred_at: Utc::now(),
        });

        self.commit(&current, &command, request.product_id).await
    }

    /// Decide, persist, then swap in the new cart and announce it.
    async fn commit(
        &self,
        current: &Cart,
        command: &CartCommand,
        product_id: ProductId,
    ) -> Result<(), CartError> {
        let (next, events) = current
            .execute(command)
            .map_err(|err| CartError::from_domain(err, product_id))?;

        let payload = serde_json::to_string(&next)
            .map_err(|e| CartError::unexpected(format!("failed to serialize cart: {e}")))?;
        self.storage.set(&self.storage_key, &payload).await?;

        let next = Arc::new(next);
        self.replace_cart(Arc::clone(&next));

        for event in events {
            tracing::info!(
                event_type = event.event_type(),
                product_id = %event.product_id(),
                lines = next.cart_size(),
                "cart updated"
            );
            let change = CartChange {
                event,
                cart: Arc::clone(&next),
            };
            match self.changes.publish(change) {
                Ok(delivered) => tracing::debug!(subscribers = delivered, "cart change published"),
                Err(err) => tracing::warn!("failed to publish cart change: {err}"),
            }
        }

        Ok(())
    }

    fn replace_cart(&self, next: Arc<Cart>) {
        match self.cart.write() {
            Ok(mut cart) => *cart = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    fn report(
        &self,
        operation: CartOperation,
        product_id: ProductId,
        result: Result<(), CartError>,
    ) -> Result<(), CartError> {
        if let Err(err) = &result {
            match err {
                CartError::Unexpected(_) => tracing::error!(
                    operation = operation.as_str(),
                    %product_id,
                    "cart operation failed: {err}"
                ),
                _ => tracing::warn!(
                    operation = operation.as_str(),
                    %product_id,
                    "cart operation rejected: {err}"
                ),
            }
            self.notifier.error(err.user_message(operation));
        }
        result
    }
}
