//! Custom product persistence and product record decoding.
//!
//! The same decoding applies to the static catalog document, so both sources
//! accept text prices and skip malformed entries the same way.

use serde::Deserialize;

use ecompro_core::{Price, Product, ProductId};

use super::{
    KeyValueStore, RecordError, RepositoryError, decode_records, keys, read_json, write_json,
};

/// Product record as found in storage or the catalog document.
#[derive(Deserialize)]
struct StoredProduct {
    id: serde_json::Value,
    title: String,
    price: serde_json::Value,
    category: String,
    #[serde(default)]
    img: Option<String>,
}

/// Decode a single product record, coercing the price to a number.
///
/// # Errors
///
/// Returns `RecordError` if the record lacks an id or title, or the price is
/// not a non-negative number or numeric string.
pub fn decode_product(value: serde_json::Value) -> Result<Product, RecordError> {
    let raw: StoredProduct = serde_json::from_value(value)?;

    let id = match raw.id {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    };
    if id.trim().is_empty() {
        return Err(RecordError::Missing("id"));
    }
    if raw.title.trim().is_empty() {
        return Err(RecordError::Missing("title"));
    }

    Ok(Product {
        id: ProductId::new(id),
        title: raw.title,
        price: Price::from_json(&raw.price)?,
        category: raw.category,
        img: raw.img.unwrap_or_default(),
    })
}

/// Decode a list of product records, skipping malformed ones.
#[must_use]
pub fn decode_products(source: &str, records: Vec<serde_json::Value>) -> Vec<Product> {
    decode_records(source, records, decode_product)
}

/// Repository for products created through the product adder.
pub struct CustomProductRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> CustomProductRepository<'a> {
    /// Create a new custom product repository.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Load all custom products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the backend cannot be read.
    pub fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let records: Vec<serde_json::Value> =
            read_json(self.store, keys::CUSTOM_PRODUCTS)?.unwrap_or_default();
        Ok(decode_products(keys::CUSTOM_PRODUCTS, records))
    }

    /// Replace the stored list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if encoding or writing fails.
    pub fn save(&self, products: &[Product]) -> Result<(), RepositoryError> {
        write_json(self.store, keys::CUSTOM_PRODUCTS, products)
    }

    /// Append a product to the stored list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if reading, encoding or writing fails.
    pub fn append(&self, product: &Product) -> Result<(), RepositoryError> {
        let mut products = self.list()?;
        products.push(product.clone());
        self.save(&products)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_decode_coerces_text_price() {
        let product = decode_product(json!({
            "id": "cust-1", "title": "Mug", "price": "250", "category": "Home"
        }))
        .unwrap();
        assert_eq!(product.price, Price::from_units(250));
        assert_eq!(product.img, "");
    }

    #[test]
    fn test_decode_accepts_numeric_id() {
        let product = decode_product(json!({
            "id": 7, "title": "Mug", "price": 250, "category": "Home", "img": "x.png"
        }))
        .unwrap();
        assert_eq!(product.id.as_str(), "7");
    }

    #[test]
    fn test_decode_rejects_bad_records() {
        assert!(matches!(
            decode_product(json!({"id": "", "title": "Mug", "price": 1, "category": "Home"})),
            Err(RecordError::Missing("id"))
        ));
        assert!(matches!(
            decode_product(json!({"id": "a", "title": "Mug", "price": "NaN?", "category": "Home"})),
            Err(RecordError::Price(_))
        ));
        assert!(matches!(
            decode_product(json!({"id": "a", "price": 1})),
            Err(RecordError::Shape(_))
        ));
    }

    #[test]
    fn test_list_skips_malformed_entries() {
        let store = MemoryStore::new();
        store
            .set(
                keys::CUSTOM_PRODUCTS,
                &json!([
                    {"id": "cust-1", "title": "Mug", "price": "250", "category": "Home"},
                    {"id": "cust-2", "title": "Bad", "price": -1, "category": "Home"},
                    "not even an object"
                ])
                .to_string(),
            )
            .unwrap();

        let products = CustomProductRepository::new(&store).list().unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].id.as_str(), "cust-1");
    }

    #[test]
    fn test_list_treats_garbage_blob_as_empty() {
        let store = MemoryStore::new();
        store.set(keys::CUSTOM_PRODUCTS, "{not json").unwrap();
        assert!(CustomProductRepository::new(&store).list().unwrap().is_empty());
    }

    #[test]
    fn test_append_persists_numeric_price() {
        let store = MemoryStore::new();
        let repo = CustomProductRepository::new(&store);
        repo.append(&Product {
            id: ProductId::new("cust-9"),
            title: "Scarf".to_owned(),
            price: Price::from_units(300),
            category: "Apparel".to_owned(),
            img: String::new(),
        })
        .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&store.get(keys::CUSTOM_PRODUCTS).unwrap().unwrap()).unwrap();
        assert_eq!(raw[0]["price"], json!(300));
        assert_eq!(repo.list().unwrap().len(), 1);
    }
}
