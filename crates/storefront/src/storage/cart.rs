//! Cart snapshot persistence.

use indexmap::IndexMap;
use serde::Deserialize;

use ecompro_core::{Price, ProductId};

use super::{KeyValueStore, RecordError, RepositoryError, keys, read_json, write_json};
use crate::models::{Cart, LineItem};

/// Line item as stored. The map key, not this record, names the product.
#[derive(Deserialize)]
struct StoredLineItem {
    title: String,
    price: serde_json::Value,
    qty: serde_json::Value,
}

/// Decode a whole-number quantity of at least one.
fn decode_qty(value: &serde_json::Value) -> Result<u32, RecordError> {
    let qty = value
        .as_u64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0)
                .map(|f| {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    // Integral and non-negative, checked above
                    let whole = f as u64;
                    whole
                })
        })
        .and_then(|q| u32::try_from(q).ok())
        .filter(|q| *q >= 1);

    qty.ok_or_else(|| RecordError::Quantity(value.clone()))
}

fn decode_line_item(id: &str, value: serde_json::Value) -> Result<LineItem, RecordError> {
    let raw: StoredLineItem = serde_json::from_value(value)?;
    Ok(LineItem {
        id: ProductId::new(id),
        title: raw.title,
        price: Price::from_json(&raw.price)?,
        qty: decode_qty(&raw.qty)?,
    })
}

/// Repository for the cart snapshot.
pub struct CartRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Load the stored cart.
    ///
    /// Entries with a missing title, a bad price or a quantity below one are
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the backend cannot be read.
    pub fn load(&self) -> Result<Cart, RepositoryError> {
        let entries: IndexMap<String, serde_json::Value> =
            read_json(self.store, keys::CART)?.unwrap_or_default();

        let items = entries
            .into_iter()
            .filter_map(|(id, value)| match decode_line_item(&id, value) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!(key = keys::CART, id, error = %e, "Dropping malformed cart entry");
                    None
                }
            });

        Ok(Cart::from_items(items))
    }

    /// Replace the stored cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if encoding or writing fails.
    pub fn save(&self, cart: &Cart) -> Result<(), RepositoryError> {
        write_json(self.store, keys::CART, cart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ecompro_core::Product;
    use serde_json::json;

    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        let repo = CartRepository::new(&store);

        let mut cart = Cart::new();
        cart.add(
            &Product {
                id: ProductId::new("a"),
                title: "Shoe".to_owned(),
                price: Price::from_units(10),
                category: "Apparel".to_owned(),
                img: String::new(),
            },
            2,
        )
        .unwrap();
        repo.save(&cart).unwrap();

        assert_eq!(repo.load().unwrap(), cart);
    }

    #[test]
    fn test_load_missing_is_empty() {
        let store = MemoryStore::new();
        assert!(CartRepository::new(&store).load().unwrap().is_empty());
    }

    #[test]
    fn test_load_validates_entries() {
        let store = MemoryStore::new();
        store
            .set(
                keys::CART,
                &json!({
                    "a": {"id": "a", "title": "Shoe", "price": "10", "qty": 2, "img": "x"},
                    "b": {"id": "b", "title": "Hat", "price": 5, "qty": 0},
                    "c": {"id": "c", "title": "Sock", "price": 1, "qty": 1.5},
                    "d": {"title": "Belt", "price": 3, "qty": 4.0},
                    "e": {"title": "Tie", "price": "x", "qty": 1}
                })
                .to_string(),
            )
            .unwrap();

        let cart = CartRepository::new(&store).load().unwrap();
        let ids: Vec<_> = cart.items().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["a", "d"]);
        assert_eq!(cart.get("a").unwrap().price, Price::from_units(10));
        assert_eq!(cart.get("d").unwrap().qty, 4);
    }

    #[test]
    fn test_load_garbage_blob_is_empty() {
        let store = MemoryStore::new();
        store.set(keys::CART, "[1, 2, 3]").unwrap();
        assert!(CartRepository::new(&store).load().unwrap().is_empty());
    }
}
