//! Per-visitor concierge conversations.
//!
//! Each visitor's [`Concierge`] sits behind its own lock in an in-memory
//! cache keyed by the visitor id from the session. A turn locks it to begin,
//! releases it for the completion call and locks it again to finish, so other
//! requests from the same visitor are never blocked on the call and never
//! write the transcript back.
//!
//! Idle conversations expire with the same inactivity window as the session.

use std::sync::Arc;
use std::time::Duration;

use lumina_core::Concierge;
use moka::future::Cache;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::middleware::session::SESSION_EXPIRY;

/// Upper bound on conversations held at once.
const MAX_CONVERSATIONS: u64 = 10_000;

/// A visitor's concierge, shared between that visitor's requests.
pub type Conversation = Arc<Mutex<Concierge>>;

/// In-memory conversations keyed by visitor id.
#[derive(Clone)]
pub struct ConversationStore {
    cache: Cache<Uuid, Conversation>,
}

impl ConversationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_idle_timeout(SESSION_EXPIRY)
    }

    /// Create an empty store whose conversations expire after `idle`.
    #[must_use]
    pub fn with_idle_timeout(idle: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(MAX_CONVERSATIONS)
                .time_to_idle(idle)
                .build(),
        }
    }

    /// The visitor's conversation, starting a new one with the welcome
    /// message on first use.
    pub async fn get(&self, visitor: Uuid) -> Conversation {
        self.cache
            .get_with(visitor, async { Arc::new(Mutex::new(Concierge::new())) })
            .await
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_visitor_shares_conversation() {
        let store = ConversationStore::new();
        let visitor = Uuid::new_v4();

        let first = store.get(visitor).await;
        first.lock().await.begin_text("Loafers for a summer wedding").expect("turn");

        let again = store.get(visitor).await;
        assert!(Arc::ptr_eq(&first, &again));
        assert!(again.lock().await.is_busy());

        let other = store.get(Uuid::new_v4()).await;
        assert!(!other.lock().await.is_busy());
        assert_eq!(other.lock().await.transcript().len(), 1);
    }
}
