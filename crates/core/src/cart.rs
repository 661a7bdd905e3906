//! Shopping cart state and quantity math.
//!
//! All operations are pure state transitions over the item list. They never
//! fail: unknown IDs are ignored.
//!
//! # Invariants
//!
//! - No two items share a [`ShoeId`].
//! - Every item present has `quantity >= 1`.
//! - [`Cart::total_quantity`] equals the sum of item quantities.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Shoe;
use crate::types::{Price, ShoeId};

/// What happens when a quantity change would take an item below one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuantityPolicy {
    /// The quantity stops at one; only an explicit remove deletes the item.
    ClampToOne,
    /// The item is removed once its quantity reaches zero.
    #[default]
    RemoveAtZero,
}

/// Error parsing a quantity policy name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid quantity policy: {0}")]
pub struct QuantityPolicyParseError(pub String);

impl std::str::FromStr for QuantityPolicy {
    type Err = QuantityPolicyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clamp" | "clamp_to_one" => Ok(Self::ClampToOne),
            "remove" | "remove_at_zero" => Ok(Self::RemoveAtZero),
            other => Err(QuantityPolicyParseError(other.to_string())),
        }
    }
}

/// A shoe in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub shoe: Shoe,
    pub quantity: u32,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.shoe.price * self.quantity
    }
}

/// The visitor's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Cart {
    items: Vec<CartItem>,
    policy: QuantityPolicy,
}

impl Cart {
    /// Create an empty cart using `policy` for quantity updates.
    #[must_use]
    pub const fn new(policy: QuantityPolicy) -> Self {
        Self {
            items: Vec::new(),
            policy,
        }
    }

    /// Items in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, id: &ShoeId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.shoe.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub const fn policy(&self) -> QuantityPolicy {
        self.policy
    }

    /// Sum of all item quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Add one unit of `shoe`, merging with an existing line.
    pub fn add(&mut self, shoe: Shoe) {
        if let Some(item) = self.items.iter_mut().find(|item| item.shoe.id == shoe.id) {
            item.quantity = item.quantity.saturating_add(1);
        } else {
            self.items.push(CartItem { shoe, quantity: 1 });
        }
    }

    /// Remove the line for `id` regardless of its quantity.
    pub fn remove(&mut self, id: &ShoeId) {
        self.items.retain(|item| &item.shoe.id != id);
    }

    /// Change the quantity of `id` by `delta`, applying the cart's policy.
    pub fn update_quantity(&mut self, id: &ShoeId, delta: i32) {
        let Some(item) = self.items.iter_mut().find(|item| &item.shoe.id == id) else {
            return;
        };

        let next = i64::from(item.quantity) + i64::from(delta);
        match self.policy {
            QuantityPolicy::ClampToOne => {
                item.quantity = u32::try_from(next.max(1)).unwrap_or(u32::MAX);
            }
            QuantityPolicy::RemoveAtZero => {
                if next <= 0 {
                    self.remove(id);
                } else {
                    item.quantity = u32::try_from(next).unwrap_or(u32::MAX);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn shoe(id: &str) -> Shoe {
        catalog::find(&ShoeId::new(id)).cloned().expect("catalog shoe")
    }

    fn assert_invariants(cart: &Cart) {
        let sum: u32 = cart.items().iter().map(|i| i.quantity).sum();
        assert_eq!(cart.total_quantity(), sum);
        assert!(cart.items().iter().all(|i| i.quantity >= 1));

        let mut ids: Vec<_> = cart.items().iter().map(|i| i.shoe.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), cart.items().len(), "duplicate cart ids");
    }

    #[test]
    fn test_add_same_shoe_twice_merges() {
        let mut cart = Cart::default();
        cart.add(shoe("1"));
        cart.add(shoe("1"));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.get(&ShoeId::new("1")).map(|i| i.quantity), Some(2));
        assert_eq!(cart.total_quantity(), 2);
    }

    #[test]
    fn test_remove_is_unconditional() {
        let mut cart = Cart::default();
        cart.add(shoe("2"));
        cart.add(shoe("2"));
        cart.add(shoe("3"));
        cart.remove(&ShoeId::new("2"));

        assert!(cart.get(&ShoeId::new("2")).is_none());
        assert_eq!(cart.total_quantity(), 1);

        // Removing something absent is a no-op
        cart.remove(&ShoeId::new("42"));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn test_clamp_policy_stops_at_one() {
        let mut cart = Cart::new(QuantityPolicy::ClampToOne);
        cart.add(shoe("5"));
        cart.update_quantity(&ShoeId::new("5"), -3);

        assert_eq!(cart.get(&ShoeId::new("5")).map(|i| i.quantity), Some(1));
    }

    #[test]
    fn test_remove_policy_drops_item_at_zero() {
        let mut cart = Cart::new(QuantityPolicy::RemoveAtZero);
        cart.add(shoe("5"));
        cart.add(shoe("6"));
        cart.update_quantity(&ShoeId::new("5"), -1);

        assert!(cart.get(&ShoeId::new("5")).is_none());
        assert_eq!(cart.get(&ShoeId::new("6")).map(|i| i.quantity), Some(1));
    }

    #[test]
    fn test_update_leaves_other_items_untouched() {
        let mut cart = Cart::default();
        cart.add(shoe("1"));
        cart.add(shoe("7"));
        cart.update_quantity(&ShoeId::new("7"), 4);

        assert_eq!(cart.get(&ShoeId::new("1")).map(|i| i.quantity), Some(1));
        assert_eq!(cart.get(&ShoeId::new("7")).map(|i| i.quantity), Some(5));

        cart.update_quantity(&ShoeId::new("missing"), 10);
        assert_eq!(cart.total_quantity(), 6);
    }

    #[test]
    fn test_subtotal() {
        let mut cart = Cart::default();
        cart.add(shoe("1")); // 180
        cart.add(shoe("1"));
        cart.add(shoe("2")); // 240

        assert_eq!(cart.subtotal(), Price::usd(600));
        assert_eq!(Cart::default().subtotal().display(), "$0.00");
    }

    #[test]
    fn test_mixed_operation_sequences_keep_invariants() {
        // Deterministic walk over a fixed script of operations for both policies
        let script: &[(&str, &str, i32)] = &[
            ("add", "1", 0),
            ("add", "3", 0),
            ("add", "1", 0),
            ("update", "3", -1),
            ("update", "1", 2),
            ("add", "8", 0),
            ("update", "8", -5),
            ("remove", "1", 0),
            ("add", "3", 0),
            ("update", "3", 3),
            ("remove", "9", 0),
            ("update", "3", -10),
        ];

        for policy in [QuantityPolicy::ClampToOne, QuantityPolicy::RemoveAtZero] {
            let mut cart = Cart::new(policy);
            for (op, id, delta) in script {
                match *op {
                    "add" => cart.add(shoe(id)),
                    "remove" => cart.remove(&ShoeId::new(*id)),
                    _ => cart.update_quantity(&ShoeId::new(*id), *delta),
                }
                assert_invariants(&cart);
            }
        }
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("clamp".parse::<QuantityPolicy>(), Ok(QuantityPolicy::ClampToOne));
        assert_eq!("REMOVE".parse::<QuantityPolicy>(), Ok(QuantityPolicy::RemoveAtZero));
        let err = "Never".parse::<QuantityPolicy>().expect_err("unknown policy");
        assert_eq!(err, QuantityPolicyParseError("never".to_string()));
        assert_eq!(err.to_string(), "invalid quantity policy: never");
    }
}
