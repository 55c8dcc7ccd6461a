//! EcomPro Core - Shared domain types.
//!
//! This crate provides the types shared by every EcomPro component:
//! - `storefront` - Catalog, cart, auth and checkout logic
//! - `cli` - Terminal front-end driving the storefront
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, usernames, roles, sections,
//!   themes and products

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
