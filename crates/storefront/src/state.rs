//! The storefront store.
//!
//! [`Store`] owns the catalog, the cart and the storage backends, and is the
//! single entry point for front ends. Mutations persist before they take
//! effect in memory: if a write fails, the operation returns an error and
//! neither memory nor storage changes.
//!
//! Front ends can call the typed methods directly or send a [`Command`]
//! through [`Store::dispatch`]. Either way, every successful mutation is
//! announced as a [`StoreEvent`] to [`Store::subscribe`]rs.

use std::sync::Arc;

use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::instrument;

use ecompro_core::{NewProduct, Price, Product, Theme};

use crate::catalog::{Catalog, CatalogLoader, FilterOptions, apply_filters};
use crate::config::StorefrontConfig;
use crate::error::{self, Result};
use crate::models::{Cart, CartError, LineItem, Session};
use crate::services::{AuthService, OrderConfirmation};
use crate::storage::KeyValueStore;
use crate::storage::cart::CartRepository;
use crate::storage::preferences::PreferenceRepository;
use crate::storage::products::CustomProductRepository;

const EVENT_CAPACITY: usize = 64;

/// Number of products shown on the home page.
pub const FEATURED_COUNT: usize = 4;

/// Something that changed in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    CatalogLoaded { count: usize },
    CartChanged { item_count: u64, total: Price },
    SessionChanged(Option<Session>),
    ProductAdded(Product),
    OrderPlaced(OrderConfirmation),
    ThemeChanged(Theme),
}

/// A request from a front end.
///
/// Passwords are held as secrets so commands can be logged.
#[derive(Debug, Clone)]
pub enum Command {
    LoadCatalog,
    Products(FilterOptions),
    Featured { count: usize },
    Categories,
    AddProduct(NewProduct),
    ShowCart,
    AddToCart { id: String, qty: u32 },
    UpdateQty { id: String, qty: i64 },
    RemoveItem { id: String },
    ClearCart,
    Checkout,
    Signup { username: String, password: SecretString },
    Login { username: String, password: SecretString },
    Logout,
    WhoAmI,
    Theme,
    SetTheme(Theme),
    ToggleTheme,
}

/// Snapshot of the cart for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub items: Vec<LineItem>,
    pub total: Price,
    pub item_count: u64,
}

impl From<&Cart> for CartSummary {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().cloned().collect(),
            total: cart.total(),
            item_count: cart.item_count(),
        }
    }
}

/// Result of a dispatched [`Command`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    CatalogLoaded { count: usize },
    Products(Vec<Product>),
    Categories(Vec<String>),
    ProductAdded(Product),
    Cart(CartSummary),
    Order(OrderConfirmation),
    Session(Option<Session>),
    Theme(Theme),
}

/// Storefront state and operations.
pub struct Store {
    config: StorefrontConfig,
    loader: CatalogLoader,
    catalog: Catalog,
    cart: Cart,
    local: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    events: broadcast::Sender<StoreEvent>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.config)
            .field("catalog_len", &self.catalog.len())
            .field("cart_len", &self.cart.len())
            .finish_non_exhaustive()
    }
}

impl Store {
    /// Open the store over a durable (`local`) and a session-scope backend.
    ///
    /// Creates the bootstrap admin account if missing and restores the
    /// persisted cart. The catalog starts empty until [`Store::load_catalog`].
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the bootstrap admin cannot be created or the
    /// backends cannot be read.
    pub fn open(
        config: StorefrontConfig,
        local: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
    ) -> Result<Self> {
        AuthService::new(local.as_ref(), session.as_ref()).ensure_bootstrap_admin(
            &config.admin.username,
            config.admin.password.expose_secret(),
        )?;
        if config.admin.is_default() {
            tracing::warn!("Bootstrap admin uses the default demo credentials");
        }

        let cart = CartRepository::new(local.as_ref()).load()?;
        tracing::debug!(items = cart.len(), "Restored cart");

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let loader = CatalogLoader::new(config.catalog.clone());

        Ok(Self {
            config,
            loader,
            catalog: Catalog::default(),
            cart,
            local,
            session,
            events,
        })
    }

    /// Subscribe to store events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: StoreEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.local.as_ref(), self.session.as_ref())
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Load the catalog: the static document merged with stored custom
    /// products. Returns the number of products.
    ///
    /// Never fails; an unreadable source degrades to fewer products.
    #[instrument(skip(self))]
    pub async fn load_catalog(&mut self) -> usize {
        let custom = CustomProductRepository::new(self.local.as_ref())
            .list()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Could not read custom products");
                Vec::new()
            });
        let catalog = self.loader.load(custom).await;
        self.install_catalog(catalog)
    }

    /// Replace the catalog with one loaded elsewhere. Returns the number of
    /// products.
    pub fn install_catalog(&mut self, catalog: Catalog) -> usize {
        self.catalog = catalog;
        let count = self.catalog.len();
        self.emit(StoreEvent::CatalogLoaded { count });
        count
    }

    /// The merged catalog.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Filter options for the configured section with nothing else applied.
    #[must_use]
    pub fn default_filters(&self) -> FilterOptions {
        FilterOptions::for_section(self.config.section)
    }

    /// Run the filter pipeline over the catalog.
    #[must_use]
    pub fn apply_filters(&self, opts: &FilterOptions) -> Vec<Product> {
        apply_filters(self.catalog.products(), opts)
    }

    /// The first `count` products in catalog order.
    #[must_use]
    pub fn featured(&self, count: usize) -> &[Product] {
        self.catalog.featured(count)
    }

    /// Distinct categories in the configured section, in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.catalog
            .categories()
            .into_iter()
            .filter(|category| self.config.section.includes(category))
            .map(str::to_owned)
            .collect()
    }

    /// Create a custom product. Requires an admin session.
    ///
    /// The product is stored, then appended to the catalog.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Auth` without an admin session,
    /// `StoreError::ProductInput` for invalid input, and
    /// `StoreError::Repository` if storing fails.
    #[instrument(skip(self, input), fields(title = %input.title))]
    pub fn add_custom_product(&mut self, input: NewProduct) -> Result<Product> {
        self.auth().require_admin()?;
        let product = input.validate(Utc::now())?;

        CustomProductRepository::new(self.local.as_ref()).append(&product)?;
        self.catalog.push(product.clone());

        tracing::info!(product_id = %product.id, "Added custom product");
        error::add_breadcrumb(
            "catalog",
            "Added custom product",
            Some(&[("product_id", product.id.as_str())]),
        );
        self.emit(StoreEvent::ProductAdded(product.clone()));
        Ok(product)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Sum of price times quantity.
    #[must_use]
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Persist `next` and make it the current cart.
    fn commit_cart(&mut self, next: Cart) -> Result<()> {
        CartRepository::new(self.local.as_ref()).save(&next)?;
        self.cart = next;
        self.emit(StoreEvent::CartChanged {
            item_count: self.cart.item_count(),
            total: self.cart.total(),
        });
        Ok(())
    }

    /// Add `qty` of a catalog product to the cart. Returns the new quantity
    /// of that line item.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if `id` is not in the catalog,
    /// `CartError::InvalidQuantity` if `qty` is zero and
    /// `CartError::Overflow` if the quantity or total would not fit. The cart
    /// is unchanged and nothing is stored.
    #[instrument(skip(self))]
    pub fn add_to_cart(&mut self, id: &str, qty: u32) -> Result<u32> {
        let product = self
            .catalog
            .find(id)
            .ok_or_else(|| CartError::ProductNotFound(id.into()))?;

        let mut next = self.cart.clone();
        let new_qty = next.add(product, qty)?;
        self.commit_cart(next)?;

        error::add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id)]));
        Ok(new_qty)
    }

    /// Set a line item's quantity; zero or less removes it. Returns `false`
    /// if the item is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Overflow` if the quantity or total would not fit,
    /// or `StoreError::Repository` if the cart cannot be stored.
    #[instrument(skip(self))]
    pub fn update_qty(&mut self, id: &str, qty: i64) -> Result<bool> {
        let mut next = self.cart.clone();
        if !next.set_qty(id, qty)? {
            return Ok(false);
        }
        self.commit_cart(next)?;
        Ok(true)
    }

    /// Remove a line item. Returns the removed item, if it was present.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Repository` if the cart cannot be stored.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, id: &str) -> Result<Option<LineItem>> {
        let mut next = self.cart.clone();
        let removed = next.remove(id);
        if removed.is_some() {
            self.commit_cart(next)?;
        }
        Ok(removed)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Repository` if the cart cannot be stored.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) -> Result<()> {
        self.commit_cart(Cart::new())
    }

    /// Place a demo order for the cart and empty it.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` for an empty cart, or
    /// `StoreError::Repository` if the emptied cart cannot be stored (the
    /// cart is then kept).
    #[instrument(skip(self))]
    pub fn checkout(&mut self) -> Result<OrderConfirmation> {
        let order = OrderConfirmation::from_cart(&self.cart, Utc::now())?;
        self.commit_cart(Cart::new())?;

        tracing::info!(
            order_id = %order.order_id,
            total = %order.total,
            items = order.item_count(),
            "Order placed"
        );
        error::add_breadcrumb(
            "checkout",
            "Order placed",
            Some(&[("order_id", order.order_id.as_str())]),
        );
        self.emit(StoreEvent::OrderPlaced(order.clone()));
        Ok(order)
    }

    // =========================================================================
    // Auth
    // =========================================================================

    fn session_started(&self, session: &Session) {
        error::set_sentry_user(&session.username);
        error::add_breadcrumb("auth", "Logged in", None);
        self.emit(StoreEvent::SessionChanged(Some(session.clone())));
    }

    /// Create an account and log it in.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Auth` for invalid input or a taken username.
    #[instrument(skip(self, password))]
    pub fn signup(&mut self, username: &str, password: &str) -> Result<Session> {
        let session = self.auth().signup(username, password)?;
        tracing::info!(username = %session.username, "Account created");
        self.session_started(&session);
        Ok(session)
    }

    /// Log in.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Auth` if the credentials do not match.
    #[instrument(skip(self, password))]
    pub fn login(&mut self, username: &str, password: &str) -> Result<Session> {
        let session = self.auth().login(username, password)?;
        self.session_started(&session);
        Ok(session)
    }

    /// Log out.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Auth` if the session cannot be cleared.
    #[instrument(skip(self))]
    pub fn logout(&mut self) -> Result<()> {
        self.auth().logout()?;
        error::clear_sentry_user();
        error::add_breadcrumb("auth", "Logged out", None);
        self.emit(StoreEvent::SessionChanged(None));
        Ok(())
    }

    /// The current session, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Auth` if the session cannot be read.
    pub fn session(&self) -> Result<Option<Session>> {
        Ok(self.auth().current_session()?)
    }

    // =========================================================================
    // Preferences
    // =========================================================================

    /// The stored theme.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Repository` if the preference cannot be read.
    pub fn theme(&self) -> Result<Theme> {
        Ok(PreferenceRepository::new(self.local.as_ref()).theme()?)
    }

    /// Store a theme.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Repository` if the preference cannot be stored.
    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        PreferenceRepository::new(self.local.as_ref()).set_theme(theme)?;
        self.emit(StoreEvent::ThemeChanged(theme));
        Ok(())
    }

    /// Flip between light and dark. Returns the new theme.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Repository` if the preference cannot be read or
    /// stored.
    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let theme = self.theme()?.toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Run a [`Command`].
    ///
    /// # Errors
    ///
    /// Returns whatever the underlying operation returns.
    pub async fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        let outcome = match command {
            Command::LoadCatalog => Outcome::CatalogLoaded {
                count: self.load_catalog().await,
            },
            Command::Products(opts) => Outcome::Products(self.apply_filters(&opts)),
            Command::Featured { count } => Outcome::Products(self.featured(count).to_vec()),
            Command::Categories => Outcome::Categories(self.categories()),
            Command::AddProduct(input) => Outcome::ProductAdded(self.add_custom_product(input)?),
            Command::ShowCart => Outcome::Cart(CartSummary::from(&self.cart)),
            Command::AddToCart { id, qty } => {
                self.add_to_cart(&id, qty)?;
                Outcome::Cart(CartSummary::from(&self.cart))
            }
            Command::UpdateQty { id, qty } => {
                self.update_qty(&id, qty)?;
                Outcome::Cart(CartSummary::from(&self.cart))
            }
            Command::RemoveItem { id } => {
                self.remove_item(&id)?;
                Outcome::Cart(CartSummary::from(&self.cart))
            }
            Command::ClearCart => {
                self.clear_cart()?;
                Outcome::Cart(CartSummary::from(&self.cart))
            }
            Command::Checkout => Outcome::Order(self.checkout()?),
            Command::Signup { username, password } => {
                Outcome::Session(Some(self.signup(&username, password.expose_secret())?))
            }
            Command::Login { username, password } => {
                Outcome::Session(Some(self.login(&username, password.expose_secret())?))
            }
            Command::Logout => {
                self.logout()?;
                Outcome::Session(None)
            }
            Command::WhoAmI => Outcome::Session(self.session()?),
            Command::Theme => Outcome::Theme(self.theme()?),
            Command::SetTheme(theme) => {
                self.set_theme(theme)?;
                Outcome::Theme(theme)
            }
            Command::ToggleTheme => Outcome::Theme(self.toggle_theme()?),
        };
        Ok(outcome)
    }
}
