//! Shopping cart.
//!
//! A cart maps product ids to line items. Line items copy the product's title
//! and price when first added; later catalog changes do not reach them.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ecompro_core::{Price, Product, ProductId};

/// Errors from cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// The product is not in the current catalog.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// Quantity to add must be at least one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The quantity or the cart total would not fit.
    #[error("quantity is too large")]
    Overflow,
}

/// One entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    /// Always at least 1 while the item is in a cart.
    pub qty: u32,
}

impl LineItem {
    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price * self.qty
    }
}

/// Line items keyed by product id, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: IndexMap<ProductId, LineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from already-validated line items.
    ///
    /// Items with a zero quantity are dropped; a repeated id keeps the last
    /// item.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let items = items
            .into_iter()
            .filter(|item| item.qty > 0)
            .map(|item| (item.id.clone(), item))
            .collect();
        Self { items }
    }

    /// Add `qty` of `product`, creating the line item if needed.
    ///
    /// Returns the line item's new quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `qty` is zero and
    /// `CartError::Overflow` if the quantity or total would not fit. The
    /// cart is unchanged on error.
    pub fn add(&mut self, product: &Product, qty: u32) -> Result<u32, CartError> {
        if qty == 0 {
            return Err(CartError::InvalidQuantity);
        }

        let (price, current) = self
            .items
            .get(product.id.as_str())
            .map_or((product.price, 0), |item| (item.price, item.qty));
        let new_qty = current.checked_add(qty).ok_or(CartError::Overflow)?;
        self.check_total(product.id.as_str(), price, new_qty)?;

        let item = self
            .items
            .entry(product.id.clone())
            .or_insert_with(|| LineItem {
                id: product.id.clone(),
                title: product.title.clone(),
                price: product.price,
                qty: 0,
            });
        item.qty = new_qty;
        Ok(new_qty)
    }

    /// Set the quantity of an existing line item exactly.
    ///
    /// A quantity of zero or less removes the item. Returns `false` if the
    /// item is not in the cart (nothing changes).
    ///
    /// # Errors
    ///
    /// Returns `CartError::Overflow` if the quantity or total would not fit;
    /// the cart is unchanged.
    pub fn set_qty(&mut self, id: &str, qty: i64) -> Result<bool, CartError> {
        let Some(price) = self.items.get(id).map(|item| item.price) else {
            return Ok(false);
        };

        if qty <= 0 {
            self.items.shift_remove(id);
            return Ok(true);
        }

        let qty = u32::try_from(qty).map_err(|_| CartError::Overflow)?;
        self.check_total(id, price, qty)?;
        if let Some(item) = self.items.get_mut(id) {
            item.qty = qty;
        }
        Ok(true)
    }

    /// Remove a line item, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<LineItem> {
        self.items.shift_remove(id)
    }

    /// Verify the total stays representable with line `id` at `price * qty`.
    fn check_total(&self, id: &str, price: Price, qty: u32) -> Result<(), CartError> {
        let line = price.checked_mul(qty).ok_or(CartError::Overflow)?;
        self.items()
            .filter(|item| item.id.as_str() != id)
            .try_fold(line, |sum, item| {
                item.price
                    .checked_mul(item.qty)
                    .and_then(|other| sum.checked_add(other))
            })
            .map(|_| ())
            .ok_or(CartError::Overflow)
    }

    /// Look up a line item.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.get(id)
    }

    /// Line items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = &LineItem> {
        self.items.values()
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of price times quantity over all line items.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items().map(LineItem::line_total).sum()
    }

    /// Sum of quantities over all line items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items().map(|item| u64::from(item.qty)).sum()
    }
}
