//! Demo checkout.
//!
//! Turns the cart into an order confirmation. No payment is taken and the
//! order is not stored anywhere; the caller clears the cart afterwards.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use ecompro_core::{OrderId, Price, ProductId};

use crate::models::Cart;

/// Errors from checkout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,
}

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderLine {
    pub id: ProductId,
    pub title: String,
    pub qty: u32,
    pub line_total: Price,
}

/// Summary shown after a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub lines: Vec<OrderLine>,
    pub total: Price,
    pub placed_at: DateTime<Utc>,
}

impl OrderConfirmation {
    /// Build a confirmation for `cart` placed at `now`.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` if the cart has no items.
    pub fn from_cart(cart: &Cart, now: DateTime<Utc>) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let lines = cart
            .items()
            .map(|item| OrderLine {
                id: item.id.clone(),
                title: item.title.clone(),
                qty: item.qty,
                line_total: item.line_total(),
            })
            .collect();

        Ok(Self {
            order_id: OrderId::at(now.timestamp_millis()),
            lines,
            total: cart.total(),
            placed_at: now,
        })
    }

    /// Total number of units ordered.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.qty)).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use ecompro_core::Product;

    use super::*;

    fn product(id: &str, title: &str, price: u32) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_owned(),
            price: Price::from_units(price),
            category: "Apparel".to_owned(),
            img: String::new(),
        }
    }

    #[test]
    fn test_empty_cart_rejected() {
        let now = Utc::now();
        assert_eq!(
            OrderConfirmation::from_cart(&Cart::new(), now),
            Err(CheckoutError::EmptyCart)
        );
    }

    #[test]
    fn test_confirmation_lines_and_total() {
        let mut cart = Cart::new();
        cart.add(&product("a", "Shoe", 10), 2).unwrap();
        cart.add(&product("b", "Hat", 5), 1).unwrap();
        let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();

        let order = OrderConfirmation::from_cart(&cart, now).unwrap();
        assert_eq!(order.order_id.as_str(), "ORD1700000000000");
        assert_eq!(order.total, Price::from_units(25));
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].title, "Shoe");
        assert_eq!(order.lines[0].line_total, Price::from_units(20));
        assert_eq!(order.placed_at, now);
    }
}
