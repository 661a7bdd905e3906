//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart lives in the visitor's [`StoreState`] in the session; every
//! mutation goes through the store reducer.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use lumina_core::{Action, Cart, CartItem, ShoeId, StoreState, catalog};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::{dispatch, load_store};
use crate::state::AppState;

/// HTMX event fired after every cart mutation.
pub const CART_UPDATED: &str = "cart-updated";

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    pub category: &'static str,
    pub image: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.shoe.id.to_string(),
            name: item.shoe.name.clone(),
            category: item.shoe.category.as_str(),
            image: item.shoe.image.clone(),
            price: item.shoe.price.display(),
            quantity: item.quantity,
            line_total: item.line_total().display(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
    pub open: bool,
}

impl CartView {
    /// Build the view of the cart held in `state`.
    #[must_use]
    pub fn from_state(state: &StoreState) -> Self {
        Self::new(&state.cart, state.cart_open)
    }

    #[must_use]
    pub fn new(cart: &Cart, open: bool) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal().display(),
            item_count: cart.total_quantity(),
            open,
        }
    }
}

/// Add or remove form data.
#[derive(Debug, Deserialize)]
pub struct ShoeForm {
    pub shoe_id: String,
}

/// Quantity change form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub shoe_id: String,
    pub delta: i32,
}

/// Cart drawer fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_drawer.html")]
pub struct CartDrawerTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Render the drawer and announce the change to the rest of the page.
fn updated(state: &StoreState) -> Response {
    (
        AppendHeaders([("HX-Trigger", CART_UPDATED)]),
        CartDrawerTemplate {
            cart: CartView::from_state(state),
        },
    )
        .into_response()
}

/// Open the cart drawer.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartDrawerTemplate> {
    let store = dispatch(&session, state.config().quantity_policy, Action::OpenCart).await?;
    Ok(CartDrawerTemplate {
        cart: CartView::from_state(&store),
    })
}

/// Add a shoe to the cart (HTMX).
///
/// Adding opens the drawer. Unknown shoe IDs are a 404.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ShoeForm>,
) -> Result<Response> {
    let shoe = catalog::find(&ShoeId::new(form.shoe_id.as_str()))
        .ok_or_else(|| AppError::NotFound(format!("shoe {}", form.shoe_id)))?;

    add_breadcrumb("cart", "Added to cart", Some(&[("shoe_id", shoe.id.as_str())]));

    let store = dispatch(
        &session,
        state.config().quantity_policy,
        Action::AddToCart(shoe.clone()),
    )
    .await?;
    Ok(updated(&store))
}

/// Change the quantity of a cart line by `delta` (HTMX).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let store = dispatch(
        &session,
        state.config().quantity_policy,
        Action::UpdateQuantity {
            id: ShoeId::new(form.shoe_id),
            delta: form.delta,
        },
    )
    .await?;
    Ok(updated(&store))
}

/// Remove a shoe from the cart (HTMX).
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ShoeForm>,
) -> Result<Response> {
    let store = dispatch(
        &session,
        state.config().quantity_policy,
        Action::RemoveFromCart(ShoeId::new(form.shoe_id)),
    )
    .await?;
    Ok(updated(&store))
}

/// Close the cart drawer.
#[instrument(skip(state, session))]
pub async fn close(State(state): State<AppState>, session: Session) -> Result<CartDrawerTemplate> {
    let store = dispatch(&session, state.config().quantity_policy, Action::CloseCart).await?;
    Ok(CartDrawerTemplate {
        cart: CartView::from_state(&store),
    })
}

/// Get cart count badge (HTMX).
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<CartCountTemplate> {
    let store = load_store(&session, state.config().quantity_policy).await?;
    Ok(CartCountTemplate {
        count: store.cart.total_quantity(),
    })
}

#[cfg(test)]
mod tests {
    use lumina_core::QuantityPolicy;

    use super::*;

    #[test]
    fn test_cart_view_totals() {
        let shoe = catalog::find(&ShoeId::new("1")).cloned().expect("catalog shoe");
        let state = StoreState::with_policy(QuantityPolicy::RemoveAtZero)
            .reduce(Action::AddToCart(shoe.clone()))
            .reduce(Action::AddToCart(shoe));

        let view = CartView::from_state(&state);
        assert!(view.open);
        assert_eq!(view.item_count, 2);
        assert_eq!(view.subtotal, "$360.00");
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].line_total, "$360.00");
        assert_eq!(view.items[0].price, "$180.00");
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::new(&Cart::default(), false);
        assert!(view.items.is_empty());
        assert_eq!(view.subtotal, "$0.00");
        assert_eq!(view.item_count, 0);
    }
}
