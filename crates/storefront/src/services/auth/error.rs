//! Authentication error types.

use thiserror::Error;

use crate::storage::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Username fails validation.
    #[error("invalid username: {0}")]
    InvalidUsername(#[from] ecompro_core::UsernameError),

    /// Password is empty.
    #[error("password is required")]
    EmptyPassword,

    /// Username is already taken.
    #[error("username already exists")]
    DuplicateUsername,

    /// Wrong password or unknown user.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The operation needs a logged-in session.
    #[error("not logged in")]
    NotLoggedIn,

    /// The session is not an admin.
    #[error("admin access required")]
    Forbidden,

    /// Repository/storage error.
    #[error("storage error: {0}")]
    Repository(#[from] RepositoryError),
}

impl AuthError {
    /// Whether the error is bad signup/login input rather than a state problem.
    #[must_use]
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidUsername(_) | Self::EmptyPassword)
    }
}
