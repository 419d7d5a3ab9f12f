//! Key-value storage the cart persists through.

use std::collections::HashMap;

/// Key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// Minimal string key-value storage.
///
/// Mirrors what a browser's local storage offers: reads never fail, writes
/// replace the previous value.
pub trait CartStorage {
    /// Read the value stored under `key`.
    fn read(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&mut self, key: &str, value: String);

    /// Delete the value stored under `key`.
    fn remove(&mut self, key: &str);
}

/// In-process storage backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    /// Create an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage with one pre-existing entry.
    #[must_use]
    pub fn with_entry(key: &str, value: impl Into<String>) -> Self {
        let mut storage = Self::new();
        storage.write(key, value.into());
        storage
    }
}

impl CartStorage for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_owned(), value);
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

impl<S: CartStorage + ?Sized> CartStorage for &mut S {
    fn read(&self, key: &str) -> Option<String> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: String) {
        (**self).write(key, value);
    }

    fn remove(&mut self, key: &str) {
        (**self).remove(key);
    }
}
