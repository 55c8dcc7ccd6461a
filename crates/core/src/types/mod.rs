//! Core types for EcomPro.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod product;
pub mod role;
pub mod section;
pub mod theme;
pub mod username;

pub use id::*;
pub use price::{Price, PriceError};
pub use product::{NewProduct, PLACEHOLDER_IMAGE, Product, ProductInputError};
pub use role::Role;
pub use section::Section;
pub use theme::Theme;
pub use username::{Username, UsernameError};
