//! Store page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use lumina_core::{Action, Concierge, StoreState, View};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::models::dispatch;
use crate::routes::cart::CartView;
use crate::routes::concierge::{self, ChatView};
use crate::routes::products::CatalogView;
use crate::state::AppState;

/// Store page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub active: &'static str,
    pub cart: CartView,
    pub sync_open: bool,
    pub catalog: CatalogView,
    pub chat: ChatView,
}

impl HomeTemplate {
    #[must_use]
    pub fn new(store: &StoreState, concierge: &Concierge) -> Self {
        Self {
            active: "store",
            cart: CartView::from_state(store),
            sync_open: store.sync_open,
            catalog: CatalogView::new(store.category),
            chat: ChatView::from(concierge),
        }
    }
}

/// Display the store page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<HomeTemplate> {
    let store = dispatch(
        &session,
        state.config().quantity_policy,
        Action::Navigate(View::Store),
    )
    .await?;
    let conversation = concierge::conversation(&state, &session).await?;
    let chat = conversation.lock().await;

    Ok(HomeTemplate::new(&store, &chat))
}

/// Render the store page as a first-time visitor sees it.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_fresh(state: &AppState) -> Result<String> {
    HomeTemplate::new(
        &StoreState::with_policy(state.config().quantity_policy),
        &Concierge::new(),
    )
    .render()
    .map_err(|e| AppError::Internal(format!("render store page: {e}")))
}
