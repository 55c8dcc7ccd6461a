//! Mock authentication service.
//!
//! Accounts live in the durable store with plaintext passwords and the
//! logged-in session lives in the session-scope store. There is no hashing,
//! no lockout and no expiry: this is demo authentication, not a security
//! boundary.

mod error;

pub use error::AuthError;

use ecompro_core::{Role, Username};

use crate::models::{Session, UserAccount};
use crate::storage::KeyValueStore;
use crate::storage::session::SessionRepository;
use crate::storage::users::UserRepository;

/// Authentication service.
///
/// Handles signup, login, logout and the bootstrap admin account.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    sessions: SessionRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service over the durable (`local`) and
    /// session-scope (`session`) stores.
    #[must_use]
    pub const fn new(local: &'a dyn KeyValueStore, session: &'a dyn KeyValueStore) -> Self {
        Self {
            users: UserRepository::new(local),
            sessions: SessionRepository::new(session),
        }
    }

    /// Make sure the bootstrap admin account exists.
    ///
    /// Returns `true` if the account was created. An existing account with
    /// the same name is left alone, whatever its role or password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if `username` is not valid, or
    /// `AuthError::Repository` if storage fails.
    pub fn ensure_bootstrap_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, AuthError> {
        let username = Username::parse(username)?;
        if self.users.exists(&username)? {
            return Ok(false);
        }

        self.users.create(&UserAccount {
            username,
            password: password.to_owned(),
            role: Role::Admin,
        })?;
        tracing::info!("Created bootstrap admin account");
        Ok(true)
    }

    /// Register a new account with role `user` and log it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` or `AuthError::EmptyPassword` for
    /// bad input, and `AuthError::DuplicateUsername` if the name is taken.
    pub fn signup(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let username = Username::parse(username)?;
        if password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }

        if self.users.exists(&username)? {
            return Err(AuthError::DuplicateUsername);
        }

        let account = UserAccount {
            username,
            password: password.to_owned(),
            role: Role::User,
        };
        self.users.create(&account)?;

        let session = Session::from(&account);
        self.sessions.set(&session)?;
        Ok(session)
    }

    /// Log in with an exact username and password match.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no account matches.
    pub fn login(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        // A name that cannot exist cannot match.
        let Ok(username) = Username::parse(username) else {
            return Err(AuthError::InvalidCredentials);
        };

        let account = self
            .users
            .get_by_username(&username)?
            .filter(|account| account.password_matches(password))
            .ok_or(AuthError::InvalidCredentials)?;

        let session = Session::from(&account);
        self.sessions.set(&session)?;
        Ok(session)
    }

    /// Clear the session. Logging out while logged out is not an error.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if storage fails.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.sessions.clear()?;
        Ok(())
    }

    /// The current session, if any.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if storage fails.
    pub fn current_session(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.sessions.get()?)
    }

    /// The current session, which must belong to an admin.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotLoggedIn` without a session and
    /// `AuthError::Forbidden` for a non-admin session.
    pub fn require_admin(&self) -> Result<Session, AuthError> {
        let session = self.current_session()?.ok_or(AuthError::NotLoggedIn)?;
        if !session.is_admin() {
            return Err(AuthError::Forbidden);
        }
        Ok(session)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn stores() -> (MemoryStore, MemoryStore) {
        (MemoryStore::new(), MemoryStore::new())
    }

    #[test]
    fn test_signup_then_duplicate() {
        let (local, session) = stores();
        let auth = AuthService::new(&local, &session);

        let created = auth.signup("alice", "pw").unwrap();
        assert_eq!(created.username.as_str(), "alice");
        assert_eq!(created.role, Role::User);
        assert_eq!(auth.current_session().unwrap(), Some(created));

        assert!(matches!(
            auth.signup("alice", "pw2"),
            Err(AuthError::DuplicateUsername)
        ));
    }

    #[test]
    fn test_login_requires_exact_password() {
        let (local, session) = stores();
        let auth = AuthService::new(&local, &session);
        auth.signup("alice", "pw").unwrap();
        auth.logout().unwrap();

        assert!(matches!(
            auth.login("alice", "pw2"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("alice", "PW"),
            Err(AuthError::InvalidCredentials)
        ));
        assert_eq!(auth.current_session().unwrap(), None);

        let session = auth.login("alice", "pw").unwrap();
        assert_eq!(session.username.as_str(), "alice");
    }

    #[test]
    fn test_login_unknown_user() {
        let (local, session) = stores();
        let auth = AuthService::new(&local, &session);
        assert!(matches!(
            auth.login("nobody", "pw"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("", "pw"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_signup_rejects_bad_input() {
        let (local, session) = stores();
        let auth = AuthService::new(&local, &session);
        let err = auth.signup("   ", "pw").unwrap_err();
        assert!(err.is_invalid_input());
        let err = auth.signup("bob", "").unwrap_err();
        assert!(matches!(err, AuthError::EmptyPassword));
        assert!(auth.current_session().unwrap().is_none());
    }

    #[test]
    fn test_bootstrap_admin_is_idempotent() {
        let (local, session) = stores();
        let auth = AuthService::new(&local, &session);
        assert!(auth.ensure_bootstrap_admin("admin", "password").unwrap());
        assert!(!auth.ensure_bootstrap_admin("admin", "other").unwrap());

        let session = auth.login("admin", "password").unwrap();
        assert!(session.is_admin());
        assert!(matches!(
            auth.login("admin", "other"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_require_admin() {
        let (local, session) = stores();
        let auth = AuthService::new(&local, &session);
        auth.ensure_bootstrap_admin("admin", "password").unwrap();

        assert!(matches!(auth.require_admin(), Err(AuthError::NotLoggedIn)));

        auth.signup("carol", "pw").unwrap();
        assert!(matches!(auth.require_admin(), Err(AuthError::Forbidden)));

        auth.login("admin", "password").unwrap();
        assert!(auth.require_admin().unwrap().is_admin());
    }

    #[test]
    fn test_session_is_separate_from_accounts() {
        let (local, session) = stores();
        let auth = AuthService::new(&local, &session);
        auth.signup("dave", "pw").unwrap();

        // A fresh session scope keeps the accounts but not the login.
        let fresh = MemoryStore::new();
        let auth = AuthService::new(&local, &fresh);
        assert!(auth.current_session().unwrap().is_none());
        assert!(auth.login("dave", "pw").is_ok());
    }
}
