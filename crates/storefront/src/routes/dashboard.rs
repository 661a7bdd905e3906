//! Admin dashboard route handler.
//!
//! Figures come from the configured [`MetricsProvider`](crate::services::MetricsProvider);
//! nothing here is backed by real orders.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use lumina_core::{Action, OrderStatus, View, catalog};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::models::dispatch;
use crate::routes::cart::CartView;
use crate::services::{InventoryLevel, RecentOrder, StatCard};
use crate::state::AppState;

/// Number of catalog entries shown in the inventory panel.
pub const INVENTORY_ROWS: usize = 5;

/// Order row display data for templates.
#[derive(Clone)]
pub struct OrderView {
    pub id: String,
    pub customer: &'static str,
    pub amount: String,
    pub status: String,
    pub badge: &'static str,
    pub placed: &'static str,
}

impl From<&RecentOrder> for OrderView {
    fn from(order: &RecentOrder) -> Self {
        Self {
            id: order.id.to_string(),
            customer: order.customer,
            amount: order.amount.display(),
            status: order.status.to_string(),
            badge: match order.status {
                OrderStatus::Shipped => "badge-shipped",
                OrderStatus::Processing => "badge-processing",
                OrderStatus::Delivered => "badge-delivered",
            },
            placed: order.placed,
        }
    }
}

/// Dashboard page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub active: &'static str,
    pub cart: CartView,
    pub sync_open: bool,
    pub stats: Vec<StatCard>,
    pub orders: Vec<OrderView>,
    pub inventory: Vec<InventoryLevel>,
}

/// Display the dashboard.
#[instrument(skip(state, session))]
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
) -> Result<DashboardTemplate> {
    let store = dispatch(
        &session,
        state.config().quantity_policy,
        Action::Navigate(View::Dashboard),
    )
    .await?;

    let metrics = state.metrics();
    let shoes = catalog::all();
    let shown = shoes.get(..INVENTORY_ROWS).unwrap_or(shoes);

    Ok(DashboardTemplate {
        active: "dashboard",
        cart: CartView::from_state(&store),
        sync_open: store.sync_open,
        stats: metrics.stats(),
        orders: metrics.recent_orders().iter().map(OrderView::from).collect(),
        inventory: metrics.inventory(shown),
    })
}

#[cfg(test)]
mod tests {
    use lumina_core::{OrderId, Price};

    use super::*;

    #[test]
    fn test_order_badges() {
        let order = RecentOrder {
            id: OrderId::new("#1091"),
            customer: "M. Sterling",
            amount: Price::usd(320),
            status: OrderStatus::Processing,
            placed: "15 mins ago",
        };
        let view = OrderView::from(&order);
        assert_eq!(view.badge, "badge-processing");
        assert_eq!(view.status, "Processing");
        assert_eq!(view.amount, "$320.00");
    }
}
