//! The visitor's cart.
//!
//! A cart is an ordered list of [`CartLine`]s, at most one per menu id, in
//! the order items were first added. [`CartStore`] owns the lines and writes
//! them back to its [`CartStorage`] after every mutation, serialized as a
//! JSON array under [`CART_STORAGE_KEY`].
//!
//! # Example
//!
//! ```
//! use yoloverse_core::{CartStore, CatalogItem, MemoryStorage, MenuId, Price};
//!
//! let soup = CatalogItem {
//!     id: MenuId::new(1),
//!     name: "Soto Ayam".into(),
//!     price: Price::from_cents(1000),
//!     image: "https://img.test/soto.jpg".into(),
//!     category: "Utama".into(),
//!     description: String::new(),
//! };
//!
//! let mut cart = CartStore::open(MemoryStorage::new());
//! cart.add_item(soup.clone())?;
//! cart.add_item(soup)?;
//!
//! assert_eq!(cart.lines().len(), 1);
//! assert_eq!(cart.lines()[0].quantity, 2);
//! assert_eq!(cart.total(), Price::from_cents(2000));
//! # Ok::<(), yoloverse_core::CartError>(())
//! ```

mod storage;

pub use storage::{CART_STORAGE_KEY, CartStorage, MemoryStorage};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogItem;
use crate::types::{MenuId, Price};

/// Errors from persisting the cart.
#[derive(Debug, Error)]
pub enum CartError {
    /// The cart could not be serialized for storage.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One row in the cart: a catalog item and how many of it.
///
/// Stored flat, so a line reads as the item's fields plus `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub item: CatalogItem,
    pub quantity: u32,
}

impl CartLine {
    /// A new line holding one of `item`.
    #[must_use]
    pub const fn new(item: CatalogItem) -> Self {
        Self { item, quantity: 1 }
    }

    /// The line's menu id.
    #[must_use]
    pub const fn id(&self) -> MenuId {
        self.item.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.item.price.times(self.quantity)
    }
}

/// Cart lines plus the storage they persist to.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    lines: Vec<CartLine>,
}

impl<S: CartStorage> CartStore<S> {
    /// Hydrate a store from `storage`.
    ///
    /// Absent or malformed data yields an empty cart. Stored lines sharing
    /// an id are merged into one.
    pub fn open(storage: S) -> Self {
        let lines = load_lines(&storage);
        Self { storage, lines }
    }

    /// Re-read the persisted lines without touching the store's state.
    ///
    /// Returns an empty list if nothing is stored or the data is malformed.
    #[must_use]
    pub fn load(&self) -> Vec<CartLine> {
        load_lines(&self.storage)
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Add one of `item`.
    ///
    /// Bumps the quantity of an existing line with the same id, otherwise
    /// appends a new line with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the updated cart can't be persisted.
    pub fn add_item(&mut self, item: CatalogItem) -> Result<&[CartLine], CartError> {
        match self.lines.iter_mut().find(|line| line.id() == item.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.lines.push(CartLine::new(item)),
        }
        self.persist()
    }

    /// Set the quantity of the line with `id`, clamped to at least 1.
    ///
    /// Unknown ids leave the cart as it was.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the updated cart can't be persisted.
    pub fn update_quantity(&mut self, id: MenuId, quantity: i64) -> Result<&[CartLine], CartError> {
        let clamped = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        if let Some(line) = self.lines.iter_mut().find(|line| line.id() == id) {
            line.quantity = clamped;
        }
        self.persist()
    }

    /// Remove the line with `id`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError`] if the updated cart can't be persisted.
    pub fn remove_item(&mut self, id: MenuId) -> Result<&[CartLine], CartError> {
        self.lines.retain(|line| line.id() != id);
        self.persist()
    }

    /// Sum of price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    /// Drop every line and delete the persisted cart.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.storage.remove(CART_STORAGE_KEY);
    }

    /// Give back the storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn persist(&mut self) -> Result<&[CartLine], CartError> {
        let serialized = serde_json::to_string(&self.lines)?;
        self.storage.write(CART_STORAGE_KEY, serialized);
        Ok(&self.lines)
    }
}

fn load_lines<S: CartStorage>(storage: &S) -> Vec<CartLine> {
    storage
        .read(CART_STORAGE_KEY)
        .and_then(|raw| serde_json::from_str::<Vec<CartLine>>(&raw).ok())
        .map(merge_duplicates)
        .unwrap_or_default()
}

/// Fold repeated ids into the first line carrying them, summing quantities.
///
/// Lines with a zero quantity are dropped.
fn merge_duplicates(stored: Vec<CartLine>) -> Vec<CartLine> {
    let mut lines: Vec<CartLine> = Vec::with_capacity(stored.len());
    for line in stored.into_iter().filter(|line| line.quantity > 0) {
        match lines.iter_mut().find(|existing| existing.id() == line.id()) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => lines.push(line),
        }
    }
    lines
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn dish(id: i64, cents: u32) -> CatalogItem {
        CatalogItem {
            id: MenuId::new(id),
            name: format!("Dish {id}"),
            price: Price::from_cents(cents),
            image: format!("https://img.test/{id}.jpg"),
            category: "Utama".to_string(),
            description: "Tasty".to_string(),
        }
    }

    fn recomputed_total<S: CartStorage>(store: &CartStore<S>) -> Price {
        let mut cents = rust_decimal::Decimal::ZERO;
        for line in store.lines() {
            cents += line.item.price.amount() * rust_decimal::Decimal::from(line.quantity);
        }
        Price::new(cents).unwrap()
    }

    #[test]
    fn test_add_same_item_twice_merges_lines() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(dish(1, 1000)).unwrap();
        let lines = cart.add_item(dish(1, 1000)).unwrap();

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(cart.total(), Price::from_cents(2000));
    }

    #[test]
    fn test_add_keeps_first_insertion_order() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(dish(2, 100)).unwrap();
        cart.add_item(dish(1, 100)).unwrap();
        cart.add_item(dish(2, 100)).unwrap();

        let ids: Vec<i64> = cart.lines().iter().map(|l| l.id().as_i64()).collect();
        assert_eq!(ids, [2, 1]);
    }

    #[test]
    fn test_total_and_remove() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(dish(1, 500)).unwrap();
        cart.add_item(dish(1, 500)).unwrap();
        cart.add_item(dish(2, 300)).unwrap();
        assert_eq!(cart.total(), Price::from_cents(1300));

        cart.remove_item(MenuId::new(1)).unwrap();
        assert_eq!(cart.total(), Price::from_cents(300));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_update_quantity_never_below_one() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(dish(1, 250)).unwrap();

        for quantity in [5, 0, -3, 1, i64::MIN, 2, -1] {
            cart.update_quantity(MenuId::new(1), quantity).unwrap();
            assert!(cart.lines()[0].quantity >= 1);
            assert_eq!(cart.total(), recomputed_total(&cart));
        }
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(dish(1, 250)).unwrap();
        cart.update_quantity(MenuId::new(99), 7).unwrap();
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_total_tracks_every_mutation() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(dish(1, 199)).unwrap();
        assert_eq!(cart.total(), recomputed_total(&cart));
        cart.add_item(dish(2, 1250)).unwrap();
        assert_eq!(cart.total(), recomputed_total(&cart));
        cart.update_quantity(MenuId::new(2), 4).unwrap();
        assert_eq!(cart.total(), recomputed_total(&cart));
        cart.remove_item(MenuId::new(1)).unwrap();
        assert_eq!(cart.total(), recomputed_total(&cart));
        assert_eq!(cart.total(), Price::from_cents(5000));
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_mutations_persist_immediately() {
        let mut storage = MemoryStorage::new();
        {
            let mut cart = CartStore::open(&mut storage);
            cart.add_item(dish(3, 700)).unwrap();
            cart.update_quantity(MenuId::new(3), 3).unwrap();
        }

        let reopened = CartStore::open(storage);
        assert_eq!(reopened.lines().len(), 1);
        assert_eq!(reopened.lines()[0].quantity, 3);
        assert_eq!(reopened.load(), reopened.lines());
    }

    #[test]
    fn test_clear_then_load_is_empty() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(dish(1, 100)).unwrap();
        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.load().is_empty());
        assert!(cart.into_storage().read(CART_STORAGE_KEY).is_none());
    }

    #[test]
    fn test_malformed_storage_loads_empty() {
        for raw in ["", "not json", "{\"id\":1}", "[{\"id\":\"x\"}]"] {
            let cart = CartStore::open(MemoryStorage::with_entry(CART_STORAGE_KEY, raw));
            assert!(cart.is_empty(), "expected empty cart for {raw:?}");
            assert_eq!(cart.total(), Price::ZERO);
        }
    }

    #[test]
    fn test_load_does_not_mutate() {
        let storage = MemoryStorage::with_entry(CART_STORAGE_KEY, "garbage");
        let cart = CartStore::open(storage);
        let _ = cart.load();
        assert_eq!(
            cart.into_storage().read(CART_STORAGE_KEY).as_deref(),
            Some("garbage")
        );
    }

    #[test]
    fn test_stored_layout_is_flat() {
        let mut cart = CartStore::open(MemoryStorage::new());
        cart.add_item(dish(1, 1000)).unwrap();
        let raw = cart.into_storage().read(CART_STORAGE_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(value[0]["id"], 1);
        assert_eq!(value[0]["name"], "Dish 1");
        assert_eq!(value[0]["quantity"], 1);
        assert!(value[0].get("item").is_none());
    }

    #[test]
    fn test_reads_legacy_numeric_prices() {
        let raw = r#"[{"id":4,"name":"Es Teh","price":5,"image":"https://img.test/4.jpg","category":"Minuman","description":"","quantity":2}]"#;
        let cart = CartStore::open(MemoryStorage::with_entry(CART_STORAGE_KEY, raw));
        assert_eq!(cart.total(), Price::from_cents(1000));
    }

    #[test]
    fn test_repeated_ids_load_as_one_line() {
        let mut seeded = CartStore::open(MemoryStorage::new());
        seeded.add_item(dish(1, 1000)).unwrap();
        seeded.add_item(dish(2, 300)).unwrap();
        let raw = seeded.into_storage().read(CART_STORAGE_KEY).unwrap();

        // Same lines twice over: [1, 2, 1, 2]
        let lines: Vec<serde_json::Value> = serde_json::from_str(&raw).unwrap();
        let doubled = serde_json::to_string(&[lines.clone(), lines].concat()).unwrap();

        let mut cart = CartStore::open(MemoryStorage::with_entry(CART_STORAGE_KEY, doubled));
        let ids: Vec<i64> = cart.lines().iter().map(|l| l.id().as_i64()).collect();
        assert_eq!(ids, [1, 2]);
        assert_eq!(cart.lines()[0].quantity, 2);

        let lines = cart.add_item(dish(1, 1000)).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(cart.total(), Price::from_cents(3600));
    }
}
