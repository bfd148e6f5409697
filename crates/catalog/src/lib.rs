//! Catalog/stock service access.
//!
//! The storefront asks the catalog two things: how many units of a product are
//! available, and what a product looks like. [`Catalog`] is the seam; the
//! HTTP client talks to the real service and the in-memory catalog stands in
//! for it in tests and offline demos.

pub mod catalog;
pub mod http;
pub mod in_memory;

pub use catalog::{Catalog, CatalogError, StockRecord};
pub use http::HttpCatalog;
pub use in_memory::InMemoryCatalog;
