//! Snapshot gatherer: re-reads the site's source files for a repository sync.
//!
//! Files are fetched from a [`SnapshotSource`] in configured order. A file
//! that cannot be read is skipped, so a snapshot may be partial. A generated
//! `metadata.json` is always appended.

use std::future::Future;
use std::path::{Component, Path, PathBuf};

use lumina_core::SnapshotFile;
use thiserror::Error;
use url::Url;

/// Name of the generated metadata file.
pub const METADATA_PATH: &str = "metadata.json";

/// Errors reading a single snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} for {path}")]
    Status { path: String, status: u16 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("path not allowed: {0}")]
    InvalidPath(String),
}

/// Where snapshot files are read from.
pub trait SnapshotSource: Send + Sync {
    /// Read the UTF-8 content of `path`.
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, SnapshotError>> + Send;
}

/// Reads files over HTTP from the storefront's own `/source` route.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpSource {
    /// Create a source rooted at the storefront's public base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    fn url_for(&self, path: &str) -> Result<Url, SnapshotError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| SnapshotError::InvalidPath(path.to_string()))?
            .pop_if_empty()
            .push("source")
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }
}

impl SnapshotSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<String, SnapshotError> {
        let response = self.client.get(self.url_for(path)?).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SnapshotError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

/// Reads files from a local directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SnapshotSource for DirectorySource {
    async fn fetch(&self, path: &str) -> Result<String, SnapshotError> {
        let full = resolve_path(&self.root, path)?;
        Ok(tokio::fs::read_to_string(full).await?)
    }
}

/// Join a relative, `/`-separated `path` onto `root`.
///
/// # Errors
///
/// Rejects absolute paths and any `..` component.
pub fn resolve_path(root: &Path, path: &str) -> Result<PathBuf, SnapshotError> {
    let relative = Path::new(path);
    let is_plain = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if path.is_empty() || !is_plain {
        return Err(SnapshotError::InvalidPath(path.to_string()));
    }
    Ok(root.join(relative))
}

/// Collects a fixed list of files from a source.
#[derive(Debug, Clone)]
pub struct SnapshotGatherer<S> {
    source: S,
    paths: Vec<String>,
}

impl<S: SnapshotSource> SnapshotGatherer<S> {
    #[must_use]
    pub const fn new(source: S, paths: Vec<String>) -> Self {
        Self { source, paths }
    }

    /// The configured paths, in gather order.
    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Whether `path` is one of the configured paths.
    #[must_use]
    pub fn allows(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    /// Fetch every configured path, skipping failures, then append
    /// `metadata.json`.
    pub async fn gather(&self) -> Vec<SnapshotFile> {
        let mut files = Vec::with_capacity(self.paths.len() + 1);

        for path in &self.paths {
            match self.source.fetch(path).await {
                Ok(content) => files.push(SnapshotFile::new(path.clone(), content)),
                Err(e) => tracing::debug!(path = %path, error = %e, "Skipping snapshot file"),
            }
        }

        files.push(metadata_file());
        files
    }
}

/// The generated project metadata file.
#[must_use]
pub fn metadata_file() -> SnapshotFile {
    let metadata = serde_json::json!({
        "name": "LUMINA Footwear",
        "description": "AI-powered shoe brand",
        "requestFramePermissions": ["camera"],
    });
    SnapshotFile::new(
        METADATA_PATH,
        serde_json::to_string_pretty(&metadata).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path_rejects_traversal() {
        let root = Path::new("/srv/lumina");
        assert_eq!(
            resolve_path(root, "crates/core/src/lib.rs").expect("plain path"),
            PathBuf::from("/srv/lumina/crates/core/src/lib.rs")
        );
        assert!(resolve_path(root, "../etc/passwd").is_err());
        assert!(resolve_path(root, "/etc/passwd").is_err());
        assert!(resolve_path(root, "").is_err());
    }

    #[test]
    fn test_metadata_file() {
        let file = metadata_file();
        assert_eq!(file.path, "metadata.json");
        let value: serde_json::Value = serde_json::from_str(&file.content).expect("json");
        assert_eq!(value["name"], "LUMINA Footwear");
        assert_eq!(value["requestFramePermissions"][0], "camera");
    }

    #[tokio::test]
    async fn test_http_source_skips_failures() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/source/Cargo.toml")
            .with_status(200)
            .with_body("[workspace]")
            .create_async()
            .await;
        server
            .mock("GET", "/source/missing.rs")
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/source/static/app.css")
            .with_status(200)
            .with_body("body {}")
            .create_async()
            .await;

        let source = HttpSource::new(reqwest::Client::new(), &server.url()).expect("source");
        let gatherer = SnapshotGatherer::new(
            source,
            vec![
                "Cargo.toml".to_string(),
                "missing.rs".to_string(),
                "static/app.css".to_string(),
            ],
        );

        let files = gatherer.gather().await;
        let paths: Vec<_> = files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, ["Cargo.toml", "static/app.css", "metadata.json"]);
        assert_eq!(files[0].content, "[workspace]");
    }

    #[tokio::test]
    async fn test_directory_source_reads_relative_files() {
        let root = std::env::temp_dir().join(format!("lumina-snapshot-{}", std::process::id()));
        tokio::fs::create_dir_all(root.join("src")).await.expect("mkdir");
        tokio::fs::write(root.join("src/lib.rs"), "pub fn shoe() {}")
            .await
            .expect("write");

        let gatherer = SnapshotGatherer::new(
            DirectorySource::new(&root),
            vec!["src/lib.rs".to_string(), "nope.txt".to_string()],
        );
        let files = gatherer.gather().await;

        assert_eq!(files.len(), 2);
        assert_eq!(files[0], SnapshotFile::new("src/lib.rs", "pub fn shoe() {}"));
        assert!(gatherer.allows("nope.txt"));
        assert!(!gatherer.allows("other.txt"));

        let _ = tokio::fs::remove_dir_all(&root).await;
    }
}
