//! The LUMINA shoe catalog.
//!
//! The catalog is static and lives in memory for the lifetime of the process.
//! Listing preserves insertion order; there is no sorting or pagination.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::types::{CategoryFilter, Price, ShoeCategory, ShoeId};

/// A sellable shoe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shoe {
    pub id: ShoeId,
    pub name: String,
    pub price: Price,
    pub category: ShoeCategory,
    pub description: String,
    /// Absolute URL of the product photo.
    pub image: String,
    pub colors: Vec<String>,
}

struct Entry {
    id: &'static str,
    name: &'static str,
    price: i64,
    category: ShoeCategory,
    description: &'static str,
    image: &'static str,
    colors: &'static [&'static str],
}

const ENTRIES: &[Entry] = &[
    Entry {
        id: "1",
        name: "Aurelia Prime",
        price: 180,
        category: ShoeCategory::Sneakers,
        description: "Minimalist leather sneakers with a touch of gold. Perfect for urban exploration.",
        image: "https://images.unsplash.com/photo-1549298916-b41d501d3772?q=80&w=2012&auto=format&fit=crop",
        colors: &["White", "Gold", "Black"],
    },
    Entry {
        id: "2",
        name: "Midnight Oxford",
        price: 240,
        category: ShoeCategory::Formal,
        description: "Deep black polished leather oxfords for those high-stakes moments.",
        image: "https://images.unsplash.com/photo-1614252235316-8c857d38b5f4?q=80&w=2060&auto=format&fit=crop",
        colors: &["Black"],
    },
    Entry {
        id: "3",
        name: "Alpine Trekker",
        price: 290,
        category: ShoeCategory::Boots,
        description: "Rugged yet refined. Waterproof suede with heavy-duty soles for any terrain.",
        image: "https://images.unsplash.com/photo-1520639889313-7272a74b1c73?q=80&w=1974&auto=format&fit=crop",
        colors: &["Sand", "Olive", "Charcoal"],
    },
    Entry {
        id: "4",
        name: "Starlight Stiletto",
        price: 320,
        category: ShoeCategory::Heels,
        description: "Elegance personified. Hand-set crystals on a satin finish.",
        image: "https://images.unsplash.com/photo-1543163521-1bf539c55dd2?q=80&w=2080&auto=format&fit=crop",
        colors: &["Champagne", "Silver"],
    },
    Entry {
        id: "5",
        name: "Drift Loafer",
        price: 160,
        category: ShoeCategory::Casual,
        description: "Soft pebbled leather that fits like a glove. The ultimate everyday luxury.",
        image: "https://images.unsplash.com/photo-1533867617858-e7b97e060509?q=80&w=2069&auto=format&fit=crop",
        colors: &["Tan", "Navy", "Stone"],
    },
    Entry {
        id: "6",
        name: "Velocity Runner",
        price: 210,
        category: ShoeCategory::Sneakers,
        description: "Aerodynamic mesh and carbon fiber plates for maximum performance.",
        image: "https://images.unsplash.com/photo-1542291026-7eec264c27ff?q=80&w=2070&auto=format&fit=crop",
        colors: &["Electric Blue", "White"],
    },
    Entry {
        id: "7",
        name: "Urban Chelsea",
        price: 260,
        category: ShoeCategory::Boots,
        description: "Classic silhouette with a modern elastic gusset and pull tab.",
        image: "https://images.unsplash.com/photo-1638247025967-b4e38f787b76?q=80&w=1935&auto=format&fit=crop",
        colors: &["Deep Brown", "Matte Black"],
    },
    Entry {
        id: "8",
        name: "Zenith Monk Strap",
        price: 275,
        category: ShoeCategory::Formal,
        description: "Double buckle design for the sophisticated modern gentleman.",
        image: "https://images.unsplash.com/photo-1543163521-1bf539c55dd2?q=80&w=2080&auto=format&fit=crop",
        colors: &["Cognac"],
    },
];

static CATALOG: LazyLock<Vec<Shoe>> = LazyLock::new(|| {
    ENTRIES
        .iter()
        .map(|entry| Shoe {
            id: ShoeId::new(entry.id),
            name: entry.name.to_string(),
            price: Price::usd(entry.price),
            category: entry.category,
            description: entry.description.to_string(),
            image: entry.image.to_string(),
            colors: entry.colors.iter().map(ToString::to_string).collect(),
        })
        .collect()
});

/// The full catalog in insertion order.
#[must_use]
pub fn all() -> &'static [Shoe] {
    &CATALOG
}

/// Look up a shoe by ID.
#[must_use]
pub fn find(id: &ShoeId) -> Option<&'static Shoe> {
    CATALOG.iter().find(|shoe| &shoe.id == id)
}

/// List catalog entries passing `filter`, in catalog order.
#[must_use]
pub fn list(filter: CategoryFilter) -> Vec<&'static Shoe> {
    filter_shoes(all(), filter)
}

/// Filter an arbitrary slice of shoes by category, preserving order.
#[must_use]
pub fn filter_shoes(shoes: &[Shoe], filter: CategoryFilter) -> Vec<&Shoe> {
    shoes
        .iter()
        .filter(|shoe| filter.matches(shoe.category))
        .collect()
}
