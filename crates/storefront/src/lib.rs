//! `EcomPro` storefront library.
//!
//! State management for a demo storefront: catalog loading, filtering, a
//! persisted cart, mock authentication and demo checkout. Front ends drive
//! everything through [`state::Store`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;

pub use error::{Result, StoreError};
pub use state::{Command, Outcome, Store, StoreEvent};
