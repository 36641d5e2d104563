//! Storage backend abstraction.
//!
//! This module defines the [`KeyValueStore`] trait, the only thing the journal
//! needs from durable storage: get, set, and remove a string by key. Keeping the
//! surface this small lets the store run against a directory of JSON files in
//! production and an in-memory map in tests.

use crate::domain::error::Result;

/// Key holding the serialized pin collection.
pub const DATA_KEY: &str = "pindrop-data";

/// Key holding the serialized user settings.
pub const SETTINGS_KEY: &str = "pindrop-settings";

/// Abstraction over string-valued key-value storage.
///
/// Every write replaces the whole value under a key. Implementations must not
/// leave a partially written value visible to a later [`get`](Self::get).
///
/// # Implementations
///
/// - [`FileStore`](super::FileStore): one file per key in a data directory
/// - [`MemoryStore`](super::MemoryStore): in-process map, for tests
///
/// # Examples
///
/// ```
/// use pindrop::storage::{KeyValueStore, MemoryStore};
///
/// let mut store = MemoryStore::new();
/// store.set("greeting", "hello")?;
/// assert_eq!(store.get("greeting")?.as_deref(), Some("hello"));
/// # Ok::<(), pindrop::PindropError>(())
/// ```
pub trait KeyValueStore {
    /// Reads the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key has never been written or was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails, for example when the backend is out
    /// of space.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be modified.
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
