//! Integration tests for the LUMINA storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lumina-integration-tests
//! ```
//!
//! Each test spawns the real router on an ephemeral port. The completion and
//! repository APIs are `mockito` servers, and the snapshot source root is a
//! scratch directory, so no network access or credentials are needed.
//!
//! # Test Categories
//!
//! - `storefront_catalog` - Pages, product grid, JSON catalog, headers
//! - `storefront_cart` - Cart drawer, count badge, JSON cart
//! - `storefront_concierge` - Text and image turns
//! - `storefront_sync` - Sync dialog and `/source`

#![allow(clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use lumina_core::QuantityPolicy;
use lumina_storefront::config::{GeminiConfig, GithubConfig, StorefrontConfig};
use lumina_storefront::services::PlaceholderMetrics;
use lumina_storefront::state::AppState;
use reqwest::Client;
use secrecy::SecretString;

/// Files present in every test's source root.
pub const SOURCE_FILES: &[(&str, &str)] = &[
    ("Cargo.toml", "[workspace]\nmembers = [\"crates/*\"]\n"),
    ("src/lib.rs", "pub fn walk_in_light() {}\n"),
    ("secret.txt", "not for sharing\n"),
];

/// Snapshot paths configured for every test. `missing.rs` does not exist and
/// `secret.txt` is deliberately left out.
pub const SNAPSHOT_PATHS: &[&str] = &["Cargo.toml", "src/lib.rs", "missing.rs"];

/// Model name the concierge mocks expect.
pub const MODEL: &str = "gemini-test";

/// Path of the completion endpoint on the mock server.
pub const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

/// Where the outbound services point.
#[derive(Debug, Clone, Default)]
pub struct Upstreams {
    /// Completion API origin; `None` disables the concierge.
    pub gemini: Option<String>,
    /// Repository API origin.
    pub github: Option<String>,
    pub quantity_policy: QuantityPolicy,
}

/// A running storefront plus a cookie-holding client.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    source_root: PathBuf,
}

impl TestApp {
    /// Spawn a storefront wired to `upstreams`.
    pub async fn spawn(upstreams: Upstreams) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        let source_root = write_source_root().await;
        let config = config(addr, source_root.clone(), upstreams);
        let state = AppState::with_metrics(config, Arc::new(PlaceholderMetrics::seeded(42)))
            .expect("application state");
        let app = lumina_storefront::app(state);

        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("serve");
        });

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            addr,
            client,
            source_root,
        }
    }

    /// Absolute URL for `path` on this app.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// GET `path` and return the response.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request")
    }

    /// POST a form to `path` and return the response.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request")
    }

    /// GET `path` and return the body, asserting success.
    pub async fn get_text(&self, path: &str) -> String {
        let resp = self.get(path).await;
        assert!(resp.status().is_success(), "GET {path}: {}", resp.status());
        resp.text().await.expect("body")
    }

    /// GET `path` and parse the JSON body, asserting success.
    pub async fn get_json(&self, path: &str) -> serde_json::Value {
        let resp = self.get(path).await;
        assert!(resp.status().is_success(), "GET {path}: {}", resp.status());
        resp.json().await.expect("json body")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.source_root);
    }
}

fn config(addr: SocketAddr, source_root: PathBuf, upstreams: Upstreams) -> StorefrontConfig {
    StorefrontConfig {
        host: addr.ip(),
        port: addr.port(),
        base_url: format!("http://{addr}"),
        quantity_policy: upstreams.quantity_policy,
        source_root,
        snapshot_paths: SNAPSHOT_PATHS.iter().map(ToString::to_string).collect(),
        gemini: GeminiConfig {
            api_key: upstreams
                .gemini
                .as_ref()
                .map(|_| SecretString::from("test-gemini-key")),
            model: MODEL.to_string(),
            api_base: upstreams
                .gemini
                .unwrap_or_else(|| "http://127.0.0.1:9".to_string()),
            temperature: 0.5,
        },
        github: GithubConfig {
            api_base: upstreams
                .github
                .unwrap_or_else(|| "http://127.0.0.1:9".to_string()),
            web_base: "https://github.com".to_string(),
            default_repo: "lumina-footwear".to_string(),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

async fn write_source_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("lumina-it-{}", uuid::Uuid::new_v4()));
    for (path, content) in SOURCE_FILES {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent).await.expect("mkdir");
        }
        tokio::fs::write(&full, content).await.expect("write source file");
    }
    root
}
