//! Domain events and change notification.
//!
//! Mutations of the cart are described as events; the bus fans those events
//! out to whoever subscribed (UI bindings, the CLI, tests).

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
