//! Key-value persistence for storefront state.
//!
//! # Scopes
//!
//! Storefront state lives in two key-value scopes:
//!
//! - **local** - durable across runs: cart, custom products, accounts, theme
//! - **session** - lives as long as the process: the logged-in session
//!
//! Both scopes sit behind [`KeyValueStore`]. [`FileStore`] gives durable
//! storage (one JSON file per key), [`MemoryStore`] gives process-lifetime
//! storage and is what tests use.
//!
//! # Keys
//!
//! | Key | Scope | Shape |
//! |---|---|---|
//! | [`keys::CART`] | local | `{ id: LineItem }` |
//! | [`keys::CUSTOM_PRODUCTS`] | local | `[Product]` |
//! | [`keys::USER_DB`] | local | `[UserAccount]` |
//! | [`keys::SESSION`] | session | `Session` |
//! | [`keys::THEME`] | local | `"light" \| "dark"` (bare string) |
//!
//! Blobs carry no schema version. Every repository validates on read and
//! drops records it cannot make sense of rather than failing the whole read.

mod file;
mod memory;

pub mod cart;
pub mod preferences;
pub mod products;
pub mod session;
pub mod users;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage keys shared by every backend.
pub mod keys {
    /// Cart snapshot.
    pub const CART: &str = "ecom_demo_cart_v1";

    /// Products created through the product adder.
    pub const CUSTOM_PRODUCTS: &str = "ecom_custom_products";

    /// Account list.
    pub const USER_DB: &str = "ecom_user_db";

    /// Logged-in session (session scope).
    pub const SESSION: &str = "ecom_user_session";

    /// Theme preference.
    pub const THEME: &str = "ecom_theme";
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error on {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The key is not usable as a storage name.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// A previous writer panicked while holding the lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Errors raised by repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Backend operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Encoding a value for storage failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why a single stored record was rejected on read.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The record does not have the expected JSON shape.
    #[error("unexpected shape: {0}")]
    Shape(#[from] serde_json::Error),

    /// A required field is blank.
    #[error("missing field: {0}")]
    Missing(&'static str),

    /// The price is not a non-negative number.
    #[error("invalid price: {0}")]
    Price(#[from] ecompro_core::PriceError),

    /// The quantity is not a whole number of at least one.
    #[error("invalid quantity: {0}")]
    Quantity(serde_json::Value),

    /// The role is not one the store knows.
    #[error("{0}")]
    Role(String),

    /// The username fails validation.
    #[error("invalid username: {0}")]
    Username(#[from] ecompro_core::UsernameError),
}

/// Synchronous string key-value storage.
///
/// Every call is complete when it returns: a `get` after a successful `set`
/// observes the new value, and a failed `set` leaves the old value in place.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON blob.
///
/// A missing key reads as `None`. A blob that does not decode as `T` is
/// logged and also reads as `None`; callers fall back to their default.
fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, RepositoryError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding malformed stored value");
            Ok(None)
        }
    }
}

/// Encode and write a JSON blob.
fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), RepositoryError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)?;
    tracing::debug!(key, bytes = raw.len(), "Stored value");
    Ok(())
}

/// Decode each element of a stored JSON array independently.
///
/// Elements that fail `decode` are logged and skipped.
fn decode_records<T>(
    key: &str,
    records: Vec<serde_json::Value>,
    decode: impl Fn(serde_json::Value) -> Result<T, RecordError>,
) -> Vec<T> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match decode(record) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, index, error = %e, "Skipping malformed stored record");
                None
            }
        })
        .collect()
}
