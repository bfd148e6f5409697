use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use storefront_core::ProductId;

/// Product metadata as served by the catalog (`GET /products/{id}`).
///
/// `price` travels as a JSON number. Fields the cart does not know about are
/// kept in `extra` so they survive a save/load cycle untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProductDetails {
    pub fn new(id: ProductId, title: impl Into<String>, price: Decimal, image: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: image.into(),
            extra: Map::new(),
        }
    }
}

/// Key the cart line's own quantity is stored under.
const AMOUNT_FIELD: &str = "amount";

/// Cart line: product metadata plus the quantity in the cart.
///
/// Serialized flat, the way the storefront keeps it in local storage:
/// `{"id":1,"title":"..","price":179.9,"image":"..","amount":2}`.
/// The line's `amount` shadows any `amount` the catalog sent with the product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: ProductDetails,
    pub amount: u32,
}

impl CartItem {
    pub fn new(mut product: ProductDetails, amount: u32) -> Self {
        product.extra.remove(AMOUNT_FIELD);
        Self { product, amount }
    }

    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    /// `price × amount`.
    pub fn subtotal(&self) -> Decimal {
        self.product.price * Decimal::from(self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sneaker() -> ProductDetails {
        ProductDetails::new(
            ProductId::new(1),
            "Running sneaker",
            Decimal::new(1799, 1),
            "https://cdn.example.com/sneaker.jpg",
        )
    }

    #[test]
    fn cart_item_serializes_flat() {
        let item = CartItem::new(sneaker(), 2);
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "Running sneaker");
        assert_eq!(json["price"], 179.9);
        assert_eq!(json["amount"], 2);
        assert!(json.get("product").is_none());
    }

    #[test]
    fn unknown_catalog_fields_are_preserved() {
        let raw = r#"{"id":3,"title":"Boot","price":99,"image":"boot.jpg","brand":"Acme","amount":1}"#;
        let item: CartItem = serde_json::from_str(raw).unwrap();

        assert_eq!(item.amount, 1);
        assert_eq!(item.product.price, Decimal::from(99));
        assert_eq!(item.product.extra.get("brand"), Some(&Value::from("Acme")));
        assert!(!item.product.extra.contains_key("amount"));

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["brand"], "Acme");
    }

    #[test]
    fn subtotal_multiplies_price_by_amount() {
        let item = CartItem::new(sneaker(), 3);
        assert_eq!(item.subtotal(), Decimal::new(5397, 1));
    }

    #[test]
    fn catalog_amount_does_not_clash_with_line_amount() {
        let mut product = sneaker();
        product.extra.insert("amount".into(), Value::from(7));
        product.extra.insert("brand".into(), Value::from("Acme"));

        let item = CartItem::new(product, 2);
        let raw = serde_json::to_string(&item).unwrap();
        assert_eq!(raw.matches("\"amount\"").count(), 1);

        let back: CartItem = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, item);
        assert_eq!(back.amount, 2);
        assert_eq!(back.product.extra.get("brand"), Some(&Value::from("Acme")));
    }
}
