//! Dashboard metrics.
//!
//! There is no order or inventory backend. [`PlaceholderMetrics`] serves fixed
//! headline figures and recent orders, and random stock levels.

use std::sync::{Mutex, PoisonError};

use lumina_core::{OrderId, OrderStatus, Price, Shoe, ShoeId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A headline figure on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
    pub change: &'static str,
    pub icon: &'static str,
}

impl StatCard {
    /// Whether the change is an increase.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.change.contains('+')
    }
}

/// A row in the recent orders table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentOrder {
    pub id: OrderId,
    pub customer: &'static str,
    pub amount: Price,
    pub status: OrderStatus,
    pub placed: &'static str,
}

/// Stock level for one shoe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryLevel {
    pub shoe_id: ShoeId,
    pub name: String,
    pub image: String,
    pub stock: u32,
    /// Width of the stock bar, 0-100.
    pub fill_percent: u8,
}

/// Source of dashboard figures.
pub trait MetricsProvider: Send + Sync {
    fn stats(&self) -> Vec<StatCard>;
    fn recent_orders(&self) -> Vec<RecentOrder>;
    fn inventory(&self, shoes: &[Shoe]) -> Vec<InventoryLevel>;
}

/// Fixed figures plus random stock levels.
#[derive(Debug, Default)]
pub struct PlaceholderMetrics {
    seeded: Option<Mutex<StdRng>>,
}

impl PlaceholderMetrics {
    /// Draw stock levels from the thread RNG.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic stock levels for a given seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            seeded: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    fn draw(&self) -> (u32, u8) {
        match &self.seeded {
            Some(rng) => {
                let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
                draw_level(&mut *rng)
            }
            None => draw_level(&mut rand::rng()),
        }
    }
}

fn draw_level(rng: &mut impl Rng) -> (u32, u8) {
    (rng.random_range(5..45), rng.random_range(20..80))
}

impl MetricsProvider for PlaceholderMetrics {
    fn stats(&self) -> Vec<StatCard> {
        vec![
            StatCard {
                label: "Total Revenue",
                value: "$12,480.00".to_string(),
                change: "+12.5%",
                icon: "💰",
            },
            StatCard {
                label: "Orders Today",
                value: "18".to_string(),
                change: "+3",
                icon: "📦",
            },
            StatCard {
                label: "Conversion Rate",
                value: "3.2%".to_string(),
                change: "+0.4%",
                icon: "📈",
            },
            StatCard {
                label: "Active Concierge Chats",
                value: "4".to_string(),
                change: "Live",
                icon: "✨",
            },
        ]
    }

    fn recent_orders(&self) -> Vec<RecentOrder> {
        let order = |id: &str, customer, amount, status, placed| RecentOrder {
            id: OrderId::new(id),
            customer,
            amount: Price::usd(amount),
            status,
            placed,
        };

        vec![
            order("#1092", "S. Johansson", 180, OrderStatus::Shipped, "2 mins ago"),
            order("#1091", "M. Sterling", 320, OrderStatus::Processing, "15 mins ago"),
            order("#1090", "A. Vance", 290, OrderStatus::Delivered, "1 hour ago"),
            order("#1089", "E. Thorne", 160, OrderStatus::Shipped, "3 hours ago"),
        ]
    }

    fn inventory(&self, shoes: &[Shoe]) -> Vec<InventoryLevel> {
        shoes
            .iter()
            .map(|shoe| {
                let (stock, fill_percent) = self.draw();
                InventoryLevel {
                    shoe_id: shoe.id.clone(),
                    name: shoe.name.clone(),
                    image: shoe.image.clone(),
                    stock,
                    fill_percent,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use lumina_core::catalog;

    use super::*;

    #[test]
    fn test_stats_are_fixed() {
        let stats = PlaceholderMetrics::new().stats();
        let labels: Vec<_> = stats.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            ["Total Revenue", "Orders Today", "Conversion Rate", "Active Concierge Chats"]
        );
        assert!(stats.iter().take(3).all(StatCard::is_positive));
        assert!(!stats[3].is_positive());
    }

    #[test]
    fn test_recent_orders() {
        let orders = PlaceholderMetrics::new().recent_orders();
        assert_eq!(orders.len(), 4);
        assert_eq!(orders[0].id.as_str(), "#1092");
        assert_eq!(orders[1].amount.display(), "$320.00");
        assert_eq!(orders[2].status, OrderStatus::Delivered);
    }

    #[test]
    fn test_inventory_ranges() {
        let metrics = PlaceholderMetrics::new();
        for _ in 0..50 {
            for level in metrics.inventory(catalog::all()) {
                assert!((5..45).contains(&level.stock));
                assert!((20..80).contains(&level.fill_percent));
            }
        }
    }

    #[test]
    fn test_seeded_inventory_is_deterministic() {
        let shoes = catalog::all();
        let a = PlaceholderMetrics::seeded(7).inventory(shoes);
        let b = PlaceholderMetrics::seeded(7).inventory(shoes);
        assert_eq!(a, b);
        assert_eq!(a.len(), shoes.len());
    }
}
