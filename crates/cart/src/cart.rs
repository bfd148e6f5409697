use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use storefront_core::{Aggregate, DomainError, DomainResult, ProductId};
use storefront_events::Event;

use crate::item::{CartItem, ProductDetails};

/// Aggregate root: Cart.
///
/// An ordered list of lines, at most one per product, each with `amount >= 1`.
/// Lines keep the position of their first addition.
///
/// Persisted as the bare JSON array of lines; loading goes through
/// [`Cart::from_items`] so a stored snapshot that breaks the invariants is
/// rejected instead of silently accepted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<CartItem>", into = "Vec<CartItem>")]
pub struct Cart {
    items: Vec<CartItem>,
    version: u64,
}

impl PartialEq for Cart {
    /// Same lines in the same order. `version` only counts events applied
    /// since load, so it is not part of the value.
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for Cart {}

impl Cart {
    /// An empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from previously stored lines.
    pub fn from_items(items: Vec<CartItem>) -> DomainResult<Self> {
        for (idx, item) in items.iter().enumerate() {
            if item.amount == 0 {
                return Err(DomainError::invariant(format!(
                    "line {idx} (product {}) has amount 0",
                    item.product_id()
                )));
            }
            if items[..idx].iter().any(|prev| prev.product_id() == item.product_id()) {
                return Err(DomainError::invariant(format!(
                    "product {} appears more than once",
                    item.product_id()
                )));
            }
        }

        Ok(Self { items, version: 0 })
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn item(&self, product_id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product_id() == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.item(product_id).is_some()
    }

    /// Quantity of `product_id` currently in the cart (0 when absent).
    pub fn amount_of(&self, product_id: ProductId) -> u32 {
        self.item(product_id).map(|item| item.amount).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct products in the cart.
    pub fn cart_size(&self) -> usize {
        self.items.len()
    }

    /// Sum of all line amounts.
    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of all line subtotals.
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Decide `command` and return the cart that results from applying it.
    ///
    /// `self` is left untouched; the caller decides when (and whether) the
    /// returned value replaces the current one.
    pub fn execute(&self, command: &CartCommand) -> DomainResult<(Cart, Vec<CartEvent>)> {
        let events = self.handle(command)?;
        let mut next = self.clone();
        for event in &events {
            next.apply(event);
        }
        Ok((next, events))
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items.iter().position(|item| item.product_id() == product_id)
    }
}

impl TryFrom<Vec<CartItem>> for Cart {
    type Error = DomainError;

    fn try_from(items: Vec<CartItem>) -> Result<Self, Self::Error> {
        Cart::from_items(items)
    }
}

impl From<Cart> for Vec<CartItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

/// Command: AddProduct.
///
/// `stock` is the availability reported by the catalog at decision time.
/// `details` must be present when the product is not in the cart yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddProduct {
    pub product_id: ProductId,
    pub details: Option<ProductDetails>,
    pub stock: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveProduct {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateAmount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAmount {
    pub product_id: ProductId,
    pub amount: u32,
    pub stock: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddProduct(AddProduct),
    RemoveProduct(RemoveProduct),
    UpdateAmount(UpdateAmount),
}

/// Event: ItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub item: CartItem,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemAmountChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAmountChanged {
    pub product_id: ProductId,
    pub amount: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    ItemAdded(ItemAdded),
    ItemAmountChanged(ItemAmountChanged),
    ItemRemoved(ItemRemoved),
}

impl CartEvent {
    pub fn product_id(&self) -> ProductId {
        match self {
            CartEvent::ItemAdded(e) => e.item.product_id(),
            CartEvent::ItemAmountChanged(e) => e.product_id,
            CartEvent::ItemRemoved(e) => e.product_id,
        }
    }
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded(_) => "cart.item.added",
            CartEvent::ItemAmountChanged(_) => "cart.item.amount_changed",
            CartEvent::ItemRemoved(_) => "cart.item.removed",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::ItemAdded(e) => e.occurred_at,
            CartEvent::ItemAmountChanged(e) => e.occurred_at,
            CartEvent::ItemRemoved(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::ItemAdded(e) => match self.position(e.item.product_id()) {
                Some(idx) => self.items[idx] = e.item.clone(),
                None => self.items.push(e.item.clone()),
            },
            CartEvent::ItemAmountChanged(e) => {
                if let Some(idx) = self.position(e.product_id) {
                    self.items[idx].amount = e.amount;
                }
            }
            CartEvent::ItemRemoved(e) => {
                if let Some(idx) = self.position(e.product_id) {
                    self.items.remove(idx);
                }
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddProduct(cmd) => self.handle_add(cmd),
            CartCommand::RemoveProduct(cmd) => self.handle_remove(cmd),
            CartCommand::UpdateAmount(cmd) => self.handle_update(cmd),
        }
    }
}

impl Cart {
    fn handle_add(&self, cmd: &AddProduct) -> Result<Vec<CartEvent>, DomainError> {
        let current = self.amount_of(cmd.product_id);
        let requested = current
            .checked_add(1)
            .ok_or_else(|| DomainError::validation("amount overflow"))?;

        if requested > cmd.stock {
            return Err(DomainError::insufficient_stock(requested, cmd.stock));
        }

        if current > 0 {
            return Ok(vec![CartEvent::ItemAmountChanged(ItemAmountChanged {
                product_id: cmd.product_id,
                amount: requested,
                occurred_at: cmd.occurred_at,
            })]);
        }

        let details = cmd
            .details
            .as_ref()
            .ok_or_else(|| DomainError::validation("product details required for a new cart line"))?;
        if details.id != cmd.product_id {
            return Err(DomainError::invariant("product details id mismatch"));
        }

        Ok(vec![CartEvent::ItemAdded(ItemAdded {
            item: CartItem::new(details.clone(), requested),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveProduct) -> Result<Vec<CartEvent>, DomainError> {
        if !self.contains(cmd.product_id) {
            return Err(DomainError::not_found());
        }

        Ok(vec![CartEvent::ItemRemoved(ItemRemoved {
            product_id: cmd.product_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update(&self, cmd: &UpdateAmount) -> Result<Vec<CartEvent>, DomainError> {
        if cmd.amount == 0 {
            return Err(DomainError::validation("amount must be positive"));
        }

        // Stock is checked before existence: an out-of-stock request for an
        // absent line reports the stock problem.
        if cmd.amount > cmd.stock {
            return Err(DomainError::insufficient_stock(cmd.amount, cmd.stock));
        }

        if !self.contains(cmd.product_id) {
            return Err(DomainError::not_found());
        }

        Ok(vec![CartEvent::ItemAmountChanged(ItemAmountChanged {
            product_id: cmd.product_id,
            amount: cmd.amount,
            occurred_at: cmd.occurred_at,
        })])
    }
}
