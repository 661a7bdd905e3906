//! Shoe categories and the storefront category filter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Product category of a shoe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShoeCategory {
    Sneakers,
    Formal,
    Boots,
    Heels,
    Casual,
}

impl ShoeCategory {
    /// All categories in menu order.
    pub const ALL: [Self; 5] = [
        Self::Sneakers,
        Self::Formal,
        Self::Boots,
        Self::Heels,
        Self::Casual,
    ];

    /// Display name, identical to the serialized form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sneakers => "Sneakers",
            Self::Formal => "Formal",
            Self::Boots => "Boots",
            Self::Heels => "Heels",
            Self::Casual => "Casual",
        }
    }
}

impl fmt::Display for ShoeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a category or filter name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown category: {0}")]
pub struct CategoryParseError(pub String);

impl FromStr for ShoeCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CategoryParseError(trimmed.to_string()))
    }
}

/// The active category filter on the product grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CategoryFilter {
    /// Show the whole catalog.
    #[default]
    All,
    /// Show only shoes of exactly this category.
    Only(ShoeCategory),
}

impl CategoryFilter {
    /// Every filter option in menu order, starting with `All`.
    #[must_use]
    pub fn options() -> Vec<Self> {
        std::iter::once(Self::All)
            .chain(ShoeCategory::ALL.into_iter().map(Self::Only))
            .collect()
    }

    /// Whether a shoe of `category` passes this filter.
    #[must_use]
    pub fn matches(&self, category: ShoeCategory) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == category,
        }
    }

    /// Display name ("All" or the category name).
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(category) => category.as_str(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryFilter {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}
