//! Cart domain module.
//!
//! This crate contains the cart rules (one line per product, stock limits,
//! insertion order), implemented purely as deterministic domain logic
//! (no IO, no HTTP, no storage). Stock levels and product metadata are looked
//! up by the caller and handed in through commands.

pub mod cart;
pub mod item;

pub use cart::{
    AddProduct, Cart, CartCommand, CartEvent, ItemAdded, ItemAmountChanged, ItemRemoved,
    RemoveProduct, UpdateAmount,
};
pub use item::{CartItem, ProductDetails};
