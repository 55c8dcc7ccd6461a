//! Subcommands and their mapping onto store commands.
//!
//! The same [`Commands`] enum drives one-shot invocations and each line of
//! the interactive shell.

use clap::Subcommand;
use secrecy::SecretString;

use ecompro_core::{NewProduct, Section, Theme};
use ecompro_storefront::Command;
use ecompro_storefront::catalog::{CategoryFilter, FilterOptions, SortKey};
use ecompro_storefront::state::FEATURED_COUNT;

#[derive(Subcommand)]
pub enum Commands {
    /// List products through the filter pipeline
    Products {
        /// Section to show (apparel, electronics, all); defaults to ECOMPRO_SECTION
        #[arg(long)]
        section: Option<Section>,

        /// Exact category, or "all"
        #[arg(long, default_value = "all")]
        category: String,

        /// Case-insensitive search over title and category
        #[arg(short, long, default_value = "")]
        query: String,

        /// Sort order (default, price-asc, price-desc, title-asc)
        #[arg(long, default_value = "default")]
        sort: SortKey,
    },
    /// Show the first few products in the catalog
    Featured {
        #[arg(long, default_value_t = FEATURED_COUNT)]
        count: usize,
    },
    /// List categories in the configured section
    Categories,
    /// Add a custom product (admin only)
    ProductAdd {
        #[arg(long)]
        title: String,

        /// Price in rupees, greater than zero
        #[arg(long)]
        price: String,

        #[arg(long)]
        category: String,

        /// Image URL; a placeholder is used when omitted
        #[arg(long)]
        img: Option<String>,
    },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Place a demo order for the cart
    Checkout,
    /// Create an account and log in
    Signup {
        #[arg(value_name = "USERNAME")]
        user: String,
        #[arg(value_name = "PASSWORD")]
        pass: String,
    },
    /// Log in
    Login {
        #[arg(value_name = "USERNAME")]
        user: String,
        #[arg(value_name = "PASSWORD")]
        pass: String,
    },
    /// Log out
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show or change the display theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Start an interactive session
    Shell,
}

#[derive(Subcommand)]
pub enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        id: String,
        #[arg(long, default_value_t = 1)]
        qty: u32,
    },
    /// Set a line item's quantity; zero or less removes it
    Set {
        id: String,
        #[arg(allow_negative_numbers = true)]
        qty: i64,
    },
    /// Remove a line item
    Remove { id: String },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
pub enum ThemeAction {
    /// Show the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set the theme (light, dark)
    Set { theme: Theme },
}

impl Commands {
    /// The store command for this subcommand. `None` for commands the CLI
    /// handles itself.
    pub fn into_store_command(self, default_section: Section) -> Option<Command> {
        let command = match self {
            Self::Products {
                section,
                category,
                query,
                sort,
            } => Command::Products(FilterOptions {
                section: section.unwrap_or(default_section),
                category: CategoryFilter::from(category.as_str()),
                query,
                sort,
            }),
            Self::Featured { count } => Command::Featured { count },
            Self::Categories => Command::Categories,
            Self::ProductAdd {
                title,
                price,
                category,
                img,
            } => Command::AddProduct(NewProduct {
                title,
                price,
                category,
                img,
            }),
            Self::Cart { action } => match action.unwrap_or(CartAction::Show) {
                CartAction::Show => Command::ShowCart,
                CartAction::Add { id, qty } => Command::AddToCart { id, qty },
                CartAction::Set { id, qty } => Command::UpdateQty { id, qty },
                CartAction::Remove { id } => Command::RemoveItem { id },
                CartAction::Clear => Command::ClearCart,
            },
            Self::Checkout => Command::Checkout,
            Self::Signup { user, pass } => Command::Signup {
                username: user,
                password: SecretString::from(pass),
            },
            Self::Login { user, pass } => Command::Login {
                username: user,
                password: SecretString::from(pass),
            },
            Self::Logout => Command::Logout,
            Self::Whoami => Command::WhoAmI,
            Self::Theme { action } => match action.unwrap_or(ThemeAction::Show) {
                ThemeAction::Show => Command::Theme,
                ThemeAction::Toggle => Command::ToggleTheme,
                ThemeAction::Set { theme } => Command::SetTheme(theme),
            },
            Self::Shell => return None,
        };
        Some(command)
    }
}
