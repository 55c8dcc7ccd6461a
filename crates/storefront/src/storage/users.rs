//! Account persistence.

use serde::Deserialize;

use ecompro_core::{Role, Username};

use super::{
    KeyValueStore, RecordError, RepositoryError, decode_records, keys, read_json, write_json,
};
use crate::models::UserAccount;

#[derive(Deserialize)]
struct StoredAccount {
    username: String,
    password: String,
    role: String,
}

fn decode_account(value: serde_json::Value) -> Result<UserAccount, RecordError> {
    let raw: StoredAccount = serde_json::from_value(value)?;
    Ok(UserAccount {
        username: Username::parse(&raw.username)?,
        password: raw.password,
        role: raw.role.parse::<Role>().map_err(RecordError::Role)?,
    })
}

/// Repository for the account list.
pub struct UserRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Load every valid account.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the backend cannot be read.
    pub fn list(&self) -> Result<Vec<UserAccount>, RepositoryError> {
        let records: Vec<serde_json::Value> =
            read_json(self.store, keys::USER_DB)?.unwrap_or_default();
        Ok(decode_records(keys::USER_DB, records, decode_account))
    }

    /// Get an account by username.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the backend cannot be read.
    pub fn get_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, RepositoryError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|account| &account.username == username))
    }

    /// Whether an account with this username exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Storage` if the backend cannot be read.
    pub fn exists(&self, username: &Username) -> Result<bool, RepositoryError> {
        Ok(self.get_by_username(username)?.is_some())
    }

    /// Append an account. Uniqueness is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if reading, encoding or writing fails.
    pub fn create(&self, account: &UserAccount) -> Result<(), RepositoryError> {
        let mut accounts = self.list()?;
        accounts.push(account.clone());
        write_json(self.store, keys::USER_DB, &accounts)
    }
}
