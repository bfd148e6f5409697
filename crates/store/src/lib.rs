//! `storefront-store`: the cart state holder.
//!
//! [`CartStore`] owns the current cart, applies add/remove/update requests
//! against live stock, writes every accepted change to local storage, and
//! tells subscribers about it. Failures are shown to the user through a
//! [`Notifier`] and also returned to the caller as a [`CartError`].

pub mod error;
pub mod notifier;
pub mod store;

pub use error::{CartError, CartOperation, OUT_OF_STOCK_MESSAGE};
pub use notifier::{Notifier, RecordingNotifier, TracingNotifier};
pub use store::{CART_STORAGE_KEY, CartChange, CartStore, UpdateProductAmount};
