//! Preference persistence.
//!
//! The theme is stored as a bare string (`light` or `dark`), not JSON.

use ecompro_core::Theme;

use super::{KeyValueStore, RepositoryError, keys};

/// Repository for display preferences.
pub struct PreferenceRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> PreferenceRepository<'a> {
    /// Create a new preference repository.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Read the theme. Missing or unknown values read as the default theme.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the backend cannot be read.
    pub fn theme(&self) -> Result<Theme, RepositoryError> {
        let Some(raw) = self.store.get(keys::THEME)? else {
            return Ok(Theme::default());
        };
        Ok(raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!(key = keys::THEME, error = %e, "Ignoring unknown theme");
            Theme::default()
        }))
    }

    /// Store the theme.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the backend cannot be written.
    pub fn set_theme(&self, theme: Theme) -> Result<(), RepositoryError> {
        self.store.set(keys::THEME, theme.as_str())?;
        Ok(())
    }
}
