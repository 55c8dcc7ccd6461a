//! Unified error handling with Sentry integration.
//!
//! Every store operation returns [`Result<T>`]. Front ends call
//! [`StoreError::report`] once per failed command: storage faults are sent to
//! Sentry, while user mistakes (bad input, unknown product, wrong password)
//! are not.

use thiserror::Error;

use ecompro_core::ProductInputError;

use crate::config::ConfigError;
use crate::models::CartError;
use crate::services::{AuthError, CheckoutError};
use crate::storage::{RepositoryError, StorageError};

/// Store-level error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Persisted state could not be read or written.
    #[error("Storage error: {0}")]
    Repository(#[from] RepositoryError),

    /// Product adder input was rejected.
    #[error("Invalid product: {0}")]
    ProductInput(#[from] ProductInputError),

    /// Cart operation was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout was rejected.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Configuration is invalid.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl From<StorageError> for StoreError {
    fn from(err: StorageError) -> Self {
        Self::Repository(RepositoryError::Storage(err))
    }
}

impl StoreError {
    /// Whether this is a fault in the store rather than a rejected request.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Repository(_) | Self::Config(_) | Self::Auth(AuthError::Repository(_))
        )
    }

    /// Log the error, capture internal faults to Sentry, and return the
    /// message to show the user.
    #[must_use]
    pub fn report(&self) -> String {
        if self.is_internal() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Store error"
            );
            return "Something went wrong saving your changes".to_string();
        }

        tracing::debug!(error = %self, "Request rejected");
        match self {
            Self::Auth(AuthError::InvalidCredentials) => "Invalid credentials".to_string(),
            Self::Auth(AuthError::DuplicateUsername) => "Username already exists".to_string(),
            Self::Auth(AuthError::NotLoggedIn) => "Please log in first".to_string(),
            Self::Auth(AuthError::Forbidden) => "Only admins can do that".to_string(),
            Self::Auth(err) => err.to_string(),
            Self::ProductInput(err) => err.to_string(),
            Self::Cart(err) => err.to_string(),
            Self::Checkout(err) => err.to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Set the Sentry user context from a username.
///
/// Call this after login or signup to associate errors with users.
pub fn set_sentry_user(username: &impl ToString) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            username: Some(username.to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use ecompro_core::ProductId;

    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::from(CartError::ProductNotFound(ProductId::new("p-9")));
        assert_eq!(err.to_string(), "Cart error: product not found: p-9");

        let err = StoreError::from(CheckoutError::EmptyCart);
        assert_eq!(err.to_string(), "Checkout error: cart is empty");
    }

    #[test]
    fn test_internal_classification() {
        let storage = StoreError::from(StorageError::Poisoned);
        assert!(storage.is_internal());

        let auth_storage = StoreError::from(AuthError::Repository(RepositoryError::Storage(
            StorageError::Poisoned,
        )));
        assert!(auth_storage.is_internal());

        assert!(!StoreError::from(AuthError::InvalidCredentials).is_internal());
        assert!(!StoreError::from(ProductInputError::MissingTitle).is_internal());
    }

    #[test]
    fn test_report_messages() {
        assert_eq!(
            StoreError::from(AuthError::InvalidCredentials).report(),
            "Invalid credentials"
        );
        assert_eq!(
            StoreError::from(AuthError::Forbidden).report(),
            "Only admins can do that"
        );
        assert_eq!(
            StoreError::from(ProductInputError::InvalidPrice).report(),
            "price must be a number greater than zero"
        );
        assert_eq!(
            StoreError::from(StorageError::Poisoned).report(),
            "Something went wrong saving your changes"
        );
    }

    #[test]
    fn test_breadcrumb_without_client() {
        // No Sentry client is bound in tests; these must be no-ops.
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "a")]));
        set_sentry_user(&"alice");
        clear_sentry_user();
    }
}
