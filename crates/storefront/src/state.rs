//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;

use crate::config::StorefrontConfig;
use crate::services::gemini::GeminiError;
use crate::services::{
    ConciergeService, ConversationStore, GithubClient, GithubError, HttpSource, MetricsProvider, PlaceholderMetrics,
    SnapshotGatherer,
};

/// Error building application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("concierge: {0}")]
    Concierge(#[from] GeminiError),
    #[error("github: {0}")]
    Github(#[from] GithubError),
    #[error("invalid base_url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// configuration and the outbound service clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    concierge: ConciergeService,
    conversations: ConversationStore,
    github: GithubClient,
    snapshot: SnapshotGatherer<HttpSource>,
    metrics: Arc<dyn MetricsProvider>,
}

impl AppState {
    /// Create application state with placeholder dashboard metrics.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured URL is invalid or an HTTP client
    /// cannot be constructed.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        Self::with_metrics(config, Arc::new(PlaceholderMetrics::new()))
    }

    /// Create application state with a specific metrics provider.
    ///
    /// # Errors
    ///
    /// See [`AppState::new`].
    pub fn with_metrics(
        config: StorefrontConfig,
        metrics: Arc<dyn MetricsProvider>,
    ) -> Result<Self, StateError> {
        let concierge = ConciergeService::new(&config.gemini)?;
        let github = GithubClient::new(&config.github)?;

        let http = reqwest::Client::builder()
            .user_agent(concat!("lumina-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let snapshot = SnapshotGatherer::new(
            HttpSource::new(http, &config.base_url)?,
            config.snapshot_paths.clone(),
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                concierge,
                conversations: ConversationStore::new(),
                github,
                snapshot,
                metrics,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn concierge(&self) -> &ConciergeService {
        &self.inner.concierge
    }

    /// Concierge transcripts, keyed by visitor id.
    #[must_use]
    pub fn conversations(&self) -> &ConversationStore {
        &self.inner.conversations
    }

    #[must_use]
    pub fn github(&self) -> &GithubClient {
        &self.inner.github
    }

    /// Gatherer reading the storefront's own `/source` route.
    #[must_use]
    pub fn snapshot(&self) -> &SnapshotGatherer<HttpSource> {
        &self.inner.snapshot
    }

    #[must_use]
    pub fn metrics(&self) -> &dyn MetricsProvider {
        self.inner.metrics.as_ref()
    }
}
