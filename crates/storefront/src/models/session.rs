//! Session types.

use serde::{Deserialize, Serialize};

use ecompro_core::{Role, Username};

use super::user::UserAccount;

/// The logged-in identity for the current process.
///
/// Minimal data kept in the session scope; never the password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: Username,
    pub role: Role,
}

impl Session {
    /// Whether the session belongs to an admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&UserAccount> for Session {
    fn from(account: &UserAccount) -> Self {
        Self {
            username: account.username.clone(),
            role: account.role,
        }
    }
}
