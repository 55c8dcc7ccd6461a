//! Catalog products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::id::ProductId;
use super::price::{Price, PriceError};

/// Image used when a product has none.
pub const PLACEHOLDER_IMAGE: &str = "https://placehold.co/800x600/cccccc/333333?text=New+Product";

/// A product in the catalog.
///
/// Immutable once loaded. Identity is [`Product::id`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub category: String,
    #[serde(default)]
    pub img: String,
}

impl Product {
    /// The image URL to display, falling back to the placeholder.
    #[must_use]
    pub fn image_url(&self) -> &str {
        if self.img.trim().is_empty() {
            PLACEHOLDER_IMAGE
        } else {
            &self.img
        }
    }
}

/// Errors from validating product adder input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductInputError {
    #[error("title is required")]
    MissingTitle,
    #[error("category is required")]
    MissingCategory,
    #[error("price must be a number greater than zero")]
    InvalidPrice,
    #[error("price cannot exceed Rs {}", Price::MAX_UNITS)]
    PriceTooLarge,
}

/// Unvalidated input from the product adder form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewProduct {
    pub title: String,
    /// Price as typed by the user.
    pub price: String,
    pub category: String,
    #[serde(default)]
    pub img: Option<String>,
}

impl NewProduct {
    /// Validate the input and mint a product created at `now`.
    ///
    /// # Errors
    ///
    /// Returns `ProductInputError` if the title or category is blank, or the
    /// price is not a number strictly greater than zero and at most
    /// [`Price::MAX_UNITS`].
    pub fn validate(self, now: DateTime<Utc>) -> Result<Product, ProductInputError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ProductInputError::MissingTitle);
        }

        let price = Price::parse(&self.price).map_err(|e| match e {
            PriceError::TooLarge => ProductInputError::PriceTooLarge,
            PriceError::NotNumeric(_) | PriceError::Negative => ProductInputError::InvalidPrice,
        })?;
        if price.is_zero() {
            return Err(ProductInputError::InvalidPrice);
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err(ProductInputError::MissingCategory);
        }

        let img = self
            .img
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE);

        Ok(Product {
            id: ProductId::custom(now.timestamp_millis()),
            title: title.to_owned(),
            price,
            category: category.to_owned(),
            img: img.to_owned(),
        })
    }
}
