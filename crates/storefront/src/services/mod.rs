//! Business logic services for storefront.
//!
//! # Services
//!
//! - `gemini` - Completion API client
//! - `concierge` - Style concierge built on `gemini`, with fallback replies
//! - `conversations` - Per-visitor concierge transcripts
//! - `github` - Repository creation and file upload
//! - `snapshot` - Gathers the source files pushed by a sync
//! - `metrics` - Dashboard figures

pub mod concierge;
pub mod conversations;
pub mod gemini;
pub mod github;
pub mod metrics;
pub mod snapshot;

pub use concierge::ConciergeService;
pub use conversations::{Conversation, ConversationStore};
pub use github::{FailedUpload, GithubClient, GithubError, SyncReport};
pub use metrics::{InventoryLevel, MetricsProvider, PlaceholderMetrics, RecentOrder, StatCard};
pub use snapshot::{DirectorySource, HttpSource, SnapshotGatherer, SnapshotSource};
