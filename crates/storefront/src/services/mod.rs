//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Mock signup, login and admin checks
//! - `checkout` - Order confirmation from a cart

pub mod auth;
pub mod checkout;

pub use auth::{AuthError, AuthService};
pub use checkout::{CheckoutError, OrderConfirmation, OrderLine};
