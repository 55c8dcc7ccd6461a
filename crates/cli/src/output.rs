//! Plain-text rendering of store outcomes.

use ecompro_core::Product;
use ecompro_storefront::Outcome;
use ecompro_storefront::state::CartSummary;

/// Format a product as one grid row.
fn product_row(product: &Product) -> String {
    format!(
        "{:<16} {:<32} {:<14} {:>12}",
        product.id.as_str(),
        product.title,
        product.category,
        product.price.to_string()
    )
}

fn cart_lines(cart: &CartSummary) -> Vec<String> {
    if cart.items.is_empty() {
        return vec!["Cart is empty".to_string()];
    }

    let mut lines: Vec<String> = cart
        .items
        .iter()
        .map(|item| {
            format!(
                "{:<16} {:<32} {:>4} x {:>12} = {:>12}",
                item.id.as_str(),
                item.title,
                item.qty,
                item.price.to_string(),
                item.line_total().to_string()
            )
        })
        .collect();
    lines.push(format!("{} item(s), total {}", cart.item_count, cart.total));
    lines
}

/// The text printed for an outcome.
pub fn lines(outcome: &Outcome) -> Vec<String> {
    match outcome {
        Outcome::CatalogLoaded { count } => vec![format!("Loaded {count} products")],
        Outcome::Products(products) if products.is_empty() => {
            vec!["No products match".to_string()]
        }
        Outcome::Products(products) => products.iter().map(product_row).collect(),
        Outcome::Categories(categories) => categories.clone(),
        Outcome::ProductAdded(product) => vec![
            format!("Added {}", product_row(product).trim_end()),
            format!("  image: {}", product.image_url()),
        ],
        Outcome::Cart(cart) => cart_lines(cart),
        Outcome::Order(order) => {
            let mut lines = vec![format!("Order {} placed", order.order_id)];
            lines.extend(order.lines.iter().map(|line| {
                format!("  {} x {} = {}", line.qty, line.title, line.line_total)
            }));
            lines.push(format!("Total {}", order.total));
            lines
        }
        Outcome::Session(Some(session)) => {
            vec![format!("Logged in as {} ({})", session.username, session.role)]
        }
        Outcome::Session(None) => vec!["Not logged in".to_string()],
        Outcome::Theme(theme) => vec![format!("Theme: {theme}")],
    }
}

/// Print an outcome to stdout.
#[allow(clippy::print_stdout)]
pub fn render(outcome: &Outcome) {
    for line in lines(outcome) {
        println!("{line}");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ecompro_core::{PLACEHOLDER_IMAGE, Price, ProductId, Theme};

    use super::*;

    #[test]
    fn test_empty_cart() {
        let cart = CartSummary {
            items: Vec::new(),
            total: Price::ZERO,
            item_count: 0,
        };
        assert_eq!(lines(&Outcome::Cart(cart)), ["Cart is empty"]);
    }

    #[test]
    fn test_products_rows() {
        let product = Product {
            id: ProductId::new("a"),
            title: "Shoe".to_owned(),
            price: Price::from_units(10),
            category: "Footwear".to_owned(),
            img: String::new(),
        };
        let rendered = lines(&Outcome::Products(vec![product]));
        assert_eq!(rendered.len(), 1);
        assert!(rendered[0].contains("Shoe"));
        assert!(rendered[0].contains("Rs 10.00"));
        assert_eq!(lines(&Outcome::Products(Vec::new())), ["No products match"]);
    }

    #[test]
    fn test_product_added_shows_image() {
        let product = Product {
            id: ProductId::new("cust-1"),
            title: "Cap".to_owned(),
            price: Price::from_units(10),
            category: "Apparel".to_owned(),
            img: " ".to_owned(),
        };
        let rendered = lines(&Outcome::ProductAdded(product));
        assert!(rendered[0].starts_with("Added cust-1"));
        assert_eq!(rendered[1], format!("  image: {PLACEHOLDER_IMAGE}"));
    }

    #[test]
    fn test_theme_and_session() {
        assert_eq!(lines(&Outcome::Theme(Theme::Dark)), ["Theme: dark"]);
        assert_eq!(lines(&Outcome::Session(None)), ["Not logged in"]);
    }
}
