//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Store page
//! GET  /health                 - Health check
//! GET  /dashboard              - Admin dashboard
//!
//! # Catalog (HTMX fragment)
//! GET  /products?category=     - Filter bar and product grid
//!
//! # Cart (HTMX fragments, mutations trigger cart-updated)
//! GET  /cart                   - Open the cart drawer
//! POST /cart/add               - Add a shoe (shoe_id)
//! POST /cart/update            - Change quantity (shoe_id, delta)
//! POST /cart/remove            - Remove a shoe (shoe_id)
//! POST /cart/close             - Close the cart drawer
//! GET  /cart/count             - Cart count badge
//!
//! # Concierge (HTMX fragments, rate limited)
//! GET  /concierge              - Transcript
//! POST /concierge/messages     - Text turn (message)
//! POST /concierge/image        - Outfit photo turn (multipart image)
//!
//! # Repository sync (HTMX fragments, push rate limited)
//! GET  /sync                   - Open the dialog with a file preview
//! POST /sync                   - Push the snapshot (token, repo_name)
//! POST /sync/close             - Close the dialog
//! GET  /source/{*path}         - Raw snapshot file
//!
//! # JSON
//! GET  /api/products?category= - Filtered catalog
//! GET  /api/cart               - Cart summary
//! ```

pub mod api;
pub mod cart;
pub mod concierge;
pub mod dashboard;
pub mod home;
pub mod products;
pub mod source;
pub mod sync;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::middleware::{concierge_rate_limiter, sync_rate_limiter};
use crate::state::AppState;

/// Largest accepted outfit photo upload.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/close", post(cart::close))
        .route("/count", get(cart::count))
}

/// Create the concierge routes router.
pub fn concierge_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/messages", post(concierge::send_message))
        .route(
            "/image",
            post(concierge::send_image).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES)),
        )
        .layer(concierge_rate_limiter());

    Router::new()
        .route("/", get(concierge::show))
        .merge(limited)
}

/// Create the repository sync routes router.
pub fn sync_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(sync::open).merge(post(sync::submit).layer(sync_rate_limiter())),
        )
        .route("/close", post(sync::close))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(api::products))
        .route("/cart", get(api::cart))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/dashboard", get(dashboard::dashboard))
        .route("/products", get(products::index))
        .nest("/cart", cart_routes())
        .nest("/concierge", concierge_routes())
        .nest("/sync", sync_routes())
        .route("/source/{*path}", get(source::show))
        .nest("/api", api_routes())
}
