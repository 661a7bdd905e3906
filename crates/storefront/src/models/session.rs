//! Per-visitor state kept in the session.
//!
//! The session record is read once per request and written back whole, so
//! only short load → reduce → save sequences keep state here. The concierge
//! transcript lives in [`ConversationStore`](crate::services::ConversationStore),
//! keyed by the visitor id stored under [`keys::VISITOR`].

use lumina_core::{Action, QuantityPolicy, StoreState};
use tower_sessions::Session;
use tower_sessions::session::Error;
use uuid::Uuid;

/// Session keys.
pub mod keys {
    /// Key for the storefront [`StoreState`](lumina_core::StoreState).
    pub const STORE_STATE: &str = "store_state";

    /// Key for the visitor id that owns the concierge conversation.
    pub const VISITOR: &str = "visitor_id";
}

/// Load the visitor's storefront state, or a fresh one using `policy`.
///
/// # Errors
///
/// Returns an error if the session store fails or the stored value cannot be
/// deserialized.
pub async fn load_store(session: &Session, policy: QuantityPolicy) -> Result<StoreState, Error> {
    Ok(session
        .get::<StoreState>(keys::STORE_STATE)
        .await?
        .unwrap_or_else(|| StoreState::with_policy(policy)))
}

/// Apply one action to the stored state and persist the result.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn dispatch(
    session: &Session,
    policy: QuantityPolicy,
    action: Action,
) -> Result<StoreState, Error> {
    let state = load_store(session, policy).await?.reduce(action);
    session.insert(keys::STORE_STATE, &state).await?;
    Ok(state)
}

/// The visitor's id, assigned on first use.
///
/// Once stored the id never changes, so a stale copy of the record written
/// back by a concurrent request carries the same value.
///
/// # Errors
///
/// Returns an error if the session cannot be read or written.
pub async fn visitor_id(session: &Session) -> Result<Uuid, Error> {
    if let Some(id) = session.get::<Uuid>(keys::VISITOR).await? {
        return Ok(id);
    }

    let id = Uuid::new_v4();
    session.insert(keys::VISITOR, id).await?;
    Ok(id)
}
