//! Local key-value persistence.
//!
//! The browser's local storage, as a trait: string keys, string values,
//! whole-value reads and writes. Backends:
//! - [`InMemoryKeyValueStore`] for tests and throwaway sessions
//! - [`SqliteKeyValueStore`] for a cart that survives restarts

pub mod in_memory;
pub mod sqlite;
pub mod store;

pub use in_memory::InMemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;
pub use store::{KeyValueStore, StorageError};
