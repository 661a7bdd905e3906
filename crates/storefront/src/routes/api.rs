//! JSON endpoints for the catalog and the visitor's cart.

use axum::{
    Json,
    extract::{Query, State},
};
use lumina_core::{Price, Shoe, catalog};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::load_store;
use crate::routes::products::CategoryQuery;
use crate::state::AppState;

/// One cart line in the JSON summary.
#[derive(Debug, Serialize)]
pub struct CartLine {
    pub id: String,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    pub line_total: Price,
}

/// Cart contents and totals.
#[derive(Debug, Serialize)]
pub struct CartSummary {
    pub items: Vec<CartLine>,
    pub total_quantity: u32,
    pub subtotal: Price,
}

/// List the catalog, optionally filtered by category.
#[instrument]
pub async fn products(Query(query): Query<CategoryQuery>) -> Result<Json<Vec<Shoe>>> {
    let filter = query.filter()?;
    Ok(Json(catalog::list(filter).into_iter().cloned().collect()))
}

/// Summarize the visitor's cart.
#[instrument(skip(state, session))]
pub async fn cart(State(state): State<AppState>, session: Session) -> Result<Json<CartSummary>> {
    let store = load_store(&session, state.config().quantity_policy).await?;
    let cart = &store.cart;

    Ok(Json(CartSummary {
        items: cart
            .items()
            .iter()
            .map(|item| CartLine {
                id: item.shoe.id.to_string(),
                name: item.shoe.name.clone(),
                price: item.shoe.price,
                quantity: item.quantity,
                line_total: item.line_total(),
            })
            .collect(),
        total_quantity: cart.total_quantity(),
        subtotal: cart.subtotal(),
    }))
}
