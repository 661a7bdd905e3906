//! Per-visitor storefront state and its reducer.
//!
//! [`StoreState::reduce`] is the only way the state changes. Handlers load
//! the state from the session, apply one [`Action`] and save the result.

use serde::{Deserialize, Serialize};

use crate::cart::{Cart, QuantityPolicy};
use crate::catalog::Shoe;
use crate::types::{CategoryFilter, ShoeId, View};

/// Everything the storefront UI needs to remember between requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StoreState {
    pub view: View,
    pub category: CategoryFilter,
    pub cart: Cart,
    pub cart_open: bool,
    pub sync_open: bool,
}

/// A user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(View),
    SelectCategory(CategoryFilter),
    AddToCart(Shoe),
    RemoveFromCart(ShoeId),
    UpdateQuantity { id: ShoeId, delta: i32 },
    OpenCart,
    CloseCart,
    OpenSync,
    CloseSync,
}

impl StoreState {
    /// Fresh state whose cart uses `policy`.
    #[must_use]
    pub fn with_policy(policy: QuantityPolicy) -> Self {
        Self {
            cart: Cart::new(policy),
            ..Self::default()
        }
    }

    /// Apply `action` and return the next state.
    #[must_use]
    pub fn reduce(mut self, action: Action) -> Self {
        match action {
            Action::Navigate(view) => self.view = view,
            Action::SelectCategory(filter) => self.category = filter,
            Action::AddToCart(shoe) => {
                self.cart.add(shoe);
                self.cart_open = true;
            }
            Action::RemoveFromCart(id) => self.cart.remove(&id),
            Action::UpdateQuantity { id, delta } => self.cart.update_quantity(&id, delta),
            Action::OpenCart => self.cart_open = true,
            Action::CloseCart => self.cart_open = false,
            Action::OpenSync => self.sync_open = true,
            Action::CloseSync => self.sync_open = false,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::types::ShoeCategory;

    fn shoe(id: &str) -> Shoe {
        catalog::find(&ShoeId::new(id)).cloned().expect("catalog shoe")
    }

    #[test]
    fn test_defaults() {
        let state = StoreState::default();
        assert_eq!(state.view, View::Store);
        assert_eq!(state.category, CategoryFilter::All);
        assert!(state.cart.is_empty());
        assert!(!state.cart_open);
        assert!(!state.sync_open);
    }

    #[test]
    fn test_add_to_cart_opens_drawer() {
        let state = StoreState::default().reduce(Action::AddToCart(shoe("3")));
        assert!(state.cart_open);
        assert_eq!(state.cart.total_quantity(), 1);

        let state = state.reduce(Action::CloseCart);
        assert!(!state.cart_open);
        assert_eq!(state.cart.total_quantity(), 1);
    }

    #[test]
    fn test_navigation_and_filter_are_independent() {
        let state = StoreState::default()
            .reduce(Action::SelectCategory(CategoryFilter::Only(ShoeCategory::Heels)))
            .reduce(Action::Navigate(View::Dashboard));

        assert_eq!(state.view, View::Dashboard);
        assert_eq!(state.category, CategoryFilter::Only(ShoeCategory::Heels));
    }

    #[test]
    fn test_quantity_actions_follow_policy() {
        let id = ShoeId::new("2");
        let clamp = StoreState::with_policy(QuantityPolicy::ClampToOne)
            .reduce(Action::AddToCart(shoe("2")))
            .reduce(Action::UpdateQuantity { id: id.clone(), delta: -1 });
        assert_eq!(clamp.cart.get(&id).map(|i| i.quantity), Some(1));

        let remove = StoreState::with_policy(QuantityPolicy::RemoveAtZero)
            .reduce(Action::AddToCart(shoe("2")))
            .reduce(Action::UpdateQuantity { id: id.clone(), delta: -1 });
        assert!(remove.cart.is_empty());

        let removed = clamp.reduce(Action::RemoveFromCart(id));
        assert!(removed.cart.is_empty());
    }

    #[test]
    fn test_sync_dialog_flag() {
        let state = StoreState::default().reduce(Action::OpenSync);
        assert!(state.sync_open);
        assert!(!state.reduce(Action::CloseSync).sync_open);
    }
}
