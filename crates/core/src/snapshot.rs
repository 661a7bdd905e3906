//! Files collected for a repository sync.

use serde::{Deserialize, Serialize};

/// A source file captured by the snapshot gatherer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFile {
    /// Repository-relative path, using `/` separators.
    pub path: String,
    /// UTF-8 file contents.
    pub content: String,
}

impl SnapshotFile {
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}
