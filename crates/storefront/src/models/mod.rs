//! Domain models for the storefront.
//!
//! These are validated in-memory types. Their stored shapes and the
//! validation applied when reading them back live in [`crate::storage`].

pub mod cart;
pub mod session;
pub mod user;

pub use cart::{Cart, CartError, LineItem};
pub use session::Session;
pub use user::UserAccount;
