//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `ECOMPRO_DATA_DIR` - Directory for durable state (default: .ecompro)
//! - `ECOMPRO_CATALOG` - Catalog document, a URL or file path (default: data/products.json)
//! - `ECOMPRO_SECTION` - Page section: apparel, electronics or all (default: apparel)
//! - `ECOMPRO_ADMIN_USERNAME` - Bootstrap admin username (default: admin)
//! - `ECOMPRO_ADMIN_PASSWORD` - Bootstrap admin password (default: password)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use ecompro_core::{Section, Username};

use crate::catalog::CatalogSource;

const DEFAULT_DATA_DIR: &str = ".ecompro";
const DEFAULT_CATALOG: &str = "data/products.json";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "password";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory holding durable state
    pub data_dir: PathBuf,
    /// Where the static catalog is loaded from
    pub catalog: CatalogSource,
    /// Section the product grid is scoped to
    pub section: Section,
    /// Bootstrap admin account
    pub admin: AdminConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Bootstrap admin credentials.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: SecretString,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl AdminConfig {
    /// Whether the stock demo credentials are in use.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.username == DEFAULT_ADMIN_USERNAME
            && self.password.expose_secret() == DEFAULT_ADMIN_PASSWORD
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            password: SecretString::from(DEFAULT_ADMIN_PASSWORD),
        }
    }
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            catalog: CatalogSource::parse(DEFAULT_CATALOG),
            section: Section::default(),
            admin: AdminConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let get_or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let data_dir = PathBuf::from(get_or_default("ECOMPRO_DATA_DIR", DEFAULT_DATA_DIR));
        let catalog = CatalogSource::parse(&get_or_default("ECOMPRO_CATALOG", DEFAULT_CATALOG));
        let section = get_or_default("ECOMPRO_SECTION", "apparel")
            .parse::<Section>()
            .map_err(|e| ConfigError::InvalidEnvVar("ECOMPRO_SECTION".to_string(), e))?;

        let admin_username = get_or_default("ECOMPRO_ADMIN_USERNAME", DEFAULT_ADMIN_USERNAME);
        Username::parse(&admin_username).map_err(|e| {
            ConfigError::InvalidEnvVar("ECOMPRO_ADMIN_USERNAME".to_string(), e.to_string())
        })?;
        // Passwords are taken verbatim, whitespace included.
        let admin_password = lookup("ECOMPRO_ADMIN_PASSWORD")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string());

        Ok(Self {
            data_dir,
            catalog,
            section,
            admin: AdminConfig {
                username: admin_username,
                password: SecretString::from(admin_password),
            },
            sentry_dsn: get("SENTRY_DSN"),
            sentry_environment: get("SENTRY_ENVIRONMENT"),
        })
    }
}
