//! Account domain types.

use serde::{Deserialize, Serialize};

use ecompro_core::{Role, Username};

/// A stored account.
///
/// The password is kept and compared as plain text. This is a demo
/// storefront with mock authentication; nothing here is a security boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: Username,
    pub password: String,
    pub role: Role,
}

impl UserAccount {
    /// Whether `password` matches exactly.
    #[must_use]
    pub fn password_matches(&self, password: &str) -> bool {
        self.password == password
    }
}
