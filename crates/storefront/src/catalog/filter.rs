//! Search, filter and sort pipeline.
//!
//! [`apply_filters`] narrows the catalog in a fixed order: section, category,
//! text query, then sort. It never mutates its input and the same options
//! always produce the same list.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use ecompro_core::{Product, Section};

/// Sort order for the product grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Catalog order.
    #[default]
    Default,
    PriceAsc,
    PriceDesc,
    /// Alphabetical by title.
    TitleAsc,
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::PriceAsc => write!(f, "price-asc"),
            Self::PriceDesc => write!(f, "price-desc"),
            Self::TitleAsc => write!(f, "title-asc"),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" | "" => Ok(Self::Default),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "title-asc" => Ok(Self::TitleAsc),
            _ => Err(format!(
                "invalid sort key: {s} (expected default, price-asc, price-desc or title-asc)"
            )),
        }
    }
}

/// Category selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CategoryFilter {
    /// The "all" sentinel: no category filtering.
    #[default]
    All,
    /// Exact, case-sensitive category match.
    Exact(String),
}

impl CategoryFilter {
    /// Whether a product in `category` passes.
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Exact(wanted) => wanted == category,
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Exact(s.to_owned())
        }
    }
}

/// Everything the product grid is filtered by.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterOptions {
    pub section: Section,
    pub category: CategoryFilter,
    /// Free-text search; matched case-insensitively against title or category.
    pub query: String,
    pub sort: SortKey,
}

impl FilterOptions {
    /// Options that show a whole section in catalog order.
    #[must_use]
    pub fn for_section(section: Section) -> Self {
        Self {
            section,
            ..Self::default()
        }
    }
}

/// Title ordering in the spirit of a locale comparison: case-insensitive
/// first, with case only breaking ties, lowercase before uppercase.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Run the pipeline over `all` and return the matching products in order.
#[must_use]
pub fn apply_filters(all: &[Product], opts: &FilterOptions) -> Vec<Product> {
    let query = opts.query.trim().to_lowercase();

    let mut filtered: Vec<Product> = all
        .iter()
        .filter(|p| opts.section.includes(&p.category))
        .filter(|p| opts.category.matches(&p.category))
        .filter(|p| {
            query.is_empty()
                || p.title.to_lowercase().contains(&query)
                || p.category.to_lowercase().contains(&query)
        })
        .cloned()
        .collect();

    // Stable sorts: equal keys keep their filtered order.
    match opts.sort {
        SortKey::Default => {}
        SortKey::PriceAsc => filtered.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceDesc => filtered.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::TitleAsc => filtered.sort_by(|a, b| compare_titles(&a.title, &b.title)),
    }

    filtered
}
