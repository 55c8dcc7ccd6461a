//! Session persistence (session scope).

use super::{KeyValueStore, RepositoryError, keys, read_json, write_json};
use crate::models::Session;

/// Repository for the logged-in session record.
pub struct SessionRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> SessionRepository<'a> {
    /// Create a new session repository over the session-scope store.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Read the current session, if any. A malformed record reads as none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the backend cannot be read.
    pub fn get(&self) -> Result<Option<Session>, RepositoryError> {
        read_json(self.store, keys::SESSION)
    }

    /// Store the session.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if encoding or writing fails.
    pub fn set(&self, session: &Session) -> Result<(), RepositoryError> {
        write_json(self.store, keys::SESSION, session)
    }

    /// Clear the session.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the backend cannot be written.
    pub fn clear(&self) -> Result<(), RepositoryError> {
        self.store.remove(keys::SESSION)?;
        Ok(())
    }
}
