//! Store sections.
//!
//! A section scopes which part of the catalog a page shows. The storefront
//! has two: everything wearable under [`Section::Apparel`] and phones under
//! [`Section::Electronics`].

use serde::{Deserialize, Serialize};

/// Coarse grouping used to scope the catalog for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Everything outside the [`Section::MOBILE_CATEGORY`].
    #[default]
    Apparel,
    /// Only the [`Section::MOBILE_CATEGORY`].
    Electronics,
    /// No section scoping.
    All,
}

impl Section {
    /// The category that separates the two sections.
    pub const MOBILE_CATEGORY: &'static str = "Mobile";

    /// Whether a product in `category` belongs to this section.
    #[must_use]
    pub fn includes(self, category: &str) -> bool {
        match self {
            Self::Apparel => category != Self::MOBILE_CATEGORY,
            Self::Electronics => category == Self::MOBILE_CATEGORY,
            Self::All => true,
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Apparel => write!(f, "apparel"),
            Self::Electronics => write!(f, "electronics"),
            Self::All => write!(f, "all"),
        }
    }
}

impl std::str::FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apparel" => Ok(Self::Apparel),
            "electronics" => Ok(Self::Electronics),
            "all" => Ok(Self::All),
            _ => Err(format!("invalid section: {s}")),
        }
    }
}
