//! GitHub REST client for pushing a snapshot of the site into a repository.
//!
//! # Protocol
//!
//! 1. `GET /user` resolves the token owner's login.
//! 2. `POST /user/repos` creates the repository (422 means it already exists).
//! 3. For each file, `GET /repos/{owner}/{repo}/contents/{path}` to find an
//!    existing blob SHA, then `PUT` the same URL with the base64 content.
//!
//! Steps 1 and 2 are fatal. A failed upload is logged and recorded in the
//! [`SyncReport`]; the remaining files are still attempted. Nothing is rolled
//! back and nothing is retried.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use lumina_core::SnapshotFile;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::GithubConfig;

const ACCEPT_V3: &str = "application/vnd.github.v3+json";
const REPO_DESCRIPTION: &str = "LUMINA Shoe Brand Website - Generated with AI";

/// Errors from the repository sync.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The token was rejected by `GET /user`.
    #[error("Invalid GitHub Token")]
    InvalidToken,

    /// Repository creation failed with something other than "already exists".
    #[error("Failed to create repository ({status}): {message}")]
    CreateRepository { status: u16, message: String },

    /// A single file upload was rejected.
    #[error("upload rejected ({status}): {message}")]
    Upload { status: u16, message: String },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A configured base URL cannot carry path segments.
    #[error("invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Outcome of a completed sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Web URL of the repository.
    pub repo_url: String,
    /// Paths uploaded successfully, in upload order.
    pub uploaded: Vec<String>,
    /// Paths that failed, with the reason.
    pub failed: Vec<FailedUpload>,
}

/// A file that could not be uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedUpload {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Deserialize)]
struct User {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ExistingContent {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct CreateRepository<'a> {
    name: &'a str,
    private: bool,
    description: &'a str,
    auto_init: bool,
}

#[derive(Debug, Serialize)]
struct PutContent<'a> {
    message: String,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// GitHub REST client.
///
/// Holds no credentials; the caller passes a token to each sync.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    api_base: Url,
    web_base: String,
}

impl GithubClient {
    /// Create a client against the configured API and web origins.
    ///
    /// # Errors
    ///
    /// Returns an error if the API base is not a valid URL or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &GithubConfig) -> Result<Self, GithubError> {
        let api_base = Url::parse(&config.api_base)
            .map_err(|e| GithubError::InvalidBaseUrl(format!("{}: {e}", config.api_base)))?;
        if api_base.cannot_be_a_base() {
            return Err(GithubError::InvalidBaseUrl(config.api_base.clone()));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("lumina-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_base,
            web_base: config.web_base.trim_end_matches('/').to_string(),
        })
    }

    /// Web URL of `owner/repo`.
    #[must_use]
    pub fn repo_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/{owner}/{repo}", self.web_base)
    }

    /// Run the full protocol for `files`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidToken` if the token is rejected (no repository call is
    /// made), `CreateRepository` if creation fails for a reason other than
    /// the repository already existing, or `Http` if either of those requests
    /// cannot be sent. Per-file failures are reported in the `SyncReport`.
    #[instrument(skip(self, token, files), fields(files = files.len()))]
    pub async fn sync(
        &self,
        token: &SecretString,
        repo: &str,
        files: &[SnapshotFile],
    ) -> Result<SyncReport, GithubError> {
        let owner = self.authenticate(token).await?;
        self.create_repository(token, repo).await?;

        let mut report = SyncReport {
            repo_url: self.repo_url(&owner, repo),
            uploaded: Vec::with_capacity(files.len()),
            failed: Vec::new(),
        };

        for file in files {
            match self.upload_file(token, &owner, repo, file).await {
                Ok(()) => report.uploaded.push(file.path.clone()),
                Err(e) => {
                    tracing::warn!(path = %file.path, error = %e, "Failed to upload file");
                    report.failed.push(FailedUpload {
                        path: file.path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            repo_url = %report.repo_url,
            uploaded = report.uploaded.len(),
            failed = report.failed.len(),
            "Repository sync finished"
        );
        Ok(report)
    }

    /// Resolve the login of the token's owner.
    ///
    /// # Errors
    ///
    /// Returns `InvalidToken` on any non-success status.
    pub async fn authenticate(&self, token: &SecretString) -> Result<String, GithubError> {
        let response = self
            .request(reqwest::Method::GET, self.endpoint(&["user"])?, token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GithubError::InvalidToken);
        }

        Ok(response.json::<User>().await?.login)
    }

    /// Create a public, auto-initialized repository. An existing repository
    /// is not an error.
    ///
    /// # Errors
    ///
    /// Returns `CreateRepository` for any non-success status other than 422.
    pub async fn create_repository(
        &self,
        token: &SecretString,
        name: &str,
    ) -> Result<(), GithubError> {
        let response = self
            .request(reqwest::Method::POST, self.endpoint(&["user", "repos"])?, token)
            .json(&CreateRepository {
                name,
                private: false,
                description: REPO_DESCRIPTION,
                auto_init: true,
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::UNPROCESSABLE_ENTITY {
            tracing::debug!(repo = name, "Repository already exists");
            return Ok(());
        }

        Err(GithubError::CreateRepository {
            status: status.as_u16(),
            message: error_message(response).await,
        })
    }

    /// Create or update one file on the default branch.
    ///
    /// # Errors
    ///
    /// Returns an error if either request cannot be sent or the `PUT` is
    /// rejected.
    pub async fn upload_file(
        &self,
        token: &SecretString,
        owner: &str,
        repo: &str,
        file: &SnapshotFile,
    ) -> Result<(), GithubError> {
        let mut segments = vec!["repos", owner, repo, "contents"];
        segments.extend(file.path.split('/').filter(|s| !s.is_empty()));
        let url = self.endpoint(&segments)?;

        let existing = self
            .request(reqwest::Method::GET, url.clone(), token)
            .send()
            .await?;
        let sha = if existing.status().is_success() {
            existing.json::<ExistingContent>().await.ok().map(|c| c.sha)
        } else {
            None
        };

        let response = self
            .request(reqwest::Method::PUT, url, token)
            .json(&PutContent {
                message: format!("Sync {} from LUMINA App", file.path),
                content: STANDARD.encode(file.content.as_bytes()),
                sha: sha.as_deref(),
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        Err(GithubError::Upload {
            status: status.as_u16(),
            message: error_message(response).await,
        })
    }

    fn request(
        &self,
        method: reqwest::Method,
        url: Url,
        token: &SecretString,
    ) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header(ACCEPT, HeaderValue::from_static(ACCEPT_V3))
            .header(AUTHORIZATION, format!("token {}", token.expose_secret()))
    }

    /// Append percent-encoded path segments to the API base.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GithubError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| GithubError::InvalidBaseUrl(self.api_base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn error_message(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorBody>(&body).map_or(body, |e| e.message)
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;
    use serde_json::json;

    use super::*;

    fn client(server: &mockito::Server) -> GithubClient {
        GithubClient::new(&GithubConfig {
            api_base: server.url(),
            web_base: "https://github.example".to_string(),
            default_repo: "lumina-footwear".to_string(),
        })
        .expect("client")
    }

    fn token() -> SecretString {
        SecretString::from("ghp_test")
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = GithubClient::new(&GithubConfig::default()).expect("client");
        let url = client
            .endpoint(&["repos", "octo cat", "shop", "contents", "src", "a#b.rs"])
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octo%20cat/shop/contents/src/a%23b.rs"
        );
    }

    #[tokio::test]
    async fn test_invalid_token_stops_before_create() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/user")
            .with_status(401)
            .with_body(r#"{"message":"Bad credentials"}"#)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/user/repos")
            .expect(0)
            .create_async()
            .await;

        let err = client(&server)
            .sync(&token(), "shop", &[SnapshotFile::new("a.txt", "a")])
            .await
            .expect_err("should fail");

        assert!(matches!(err, GithubError::InvalidToken));
        assert_eq!(err.to_string(), "Invalid GitHub Token");
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_failure_is_fatal() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/user")
            .with_status(200)
            .with_body(r#"{"login":"octo"}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/user/repos")
            .with_status(403)
            .with_body(r#"{"message":"Resource not accessible by integration"}"#)
            .create_async()
            .await;

        let err = client(&server)
            .sync(&token(), "shop", &[])
            .await
            .expect_err("should fail");

        assert!(matches!(
            err,
            GithubError::CreateRepository { status: 403, ref message }
                if message == "Resource not accessible by integration"
        ));
    }

    #[tokio::test]
    async fn test_sync_uploads_with_existing_sha_and_tolerates_422() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/user")
            .match_header("authorization", "token ghp_test")
            .match_header("accept", ACCEPT_V3)
            .with_status(200)
            .with_body(r#"{"login":"octo"}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/user/repos")
            .match_body(Matcher::Json(json!({
                "name": "shop",
                "private": false,
                "description": "LUMINA Shoe Brand Website - Generated with AI",
                "auto_init": true
            })))
            .with_status(422)
            .create_async()
            .await;
        server
            .mock("GET", "/repos/octo/shop/contents/src/lib.rs")
            .with_status(200)
            .with_body(r#"{"sha":"abc123"}"#)
            .create_async()
            .await;
        let put_existing = server
            .mock("PUT", "/repos/octo/shop/contents/src/lib.rs")
            .match_body(Matcher::Json(json!({
                "message": "Sync src/lib.rs from LUMINA App",
                "content": "Zm4gbWFpbigpIHt9",
                "sha": "abc123"
            })))
            .with_status(200)
            .create_async()
            .await;
        server
            .mock("GET", "/repos/octo/shop/contents/README.md")
            .with_status(404)
            .create_async()
            .await;
        let put_new = server
            .mock("PUT", "/repos/octo/shop/contents/README.md")
            .match_body(Matcher::Json(json!({
                "message": "Sync README.md from LUMINA App",
                "content": "IyBMVU1JTkE="
            })))
            .with_status(201)
            .create_async()
            .await;

        let report = client(&server)
            .sync(
                &token(),
                "shop",
                &[
                    SnapshotFile::new("src/lib.rs", "fn main() {}"),
                    SnapshotFile::new("README.md", "# LUMINA"),
                ],
            )
            .await
            .expect("sync");

        assert_eq!(report.repo_url, "https://github.example/octo/shop");
        assert_eq!(report.uploaded, ["src/lib.rs", "README.md"]);
        assert!(report.failed.is_empty());
        put_existing.assert_async().await;
        put_new.assert_async().await;
    }

    #[tokio::test]
    async fn test_failed_upload_does_not_abort() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/user")
            .with_status(200)
            .with_body(r#"{"login":"octo"}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/user/repos")
            .with_status(201)
            .create_async()
            .await;
        server
            .mock("GET", Matcher::Regex(r"^/repos/octo/shop/contents/".to_string()))
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("PUT", "/repos/octo/shop/contents/bad.txt")
            .with_status(409)
            .with_body(r#"{"message":"conflict"}"#)
            .create_async()
            .await;
        server
            .mock("PUT", "/repos/octo/shop/contents/good.txt")
            .with_status(201)
            .create_async()
            .await;

        let report = client(&server)
            .sync(
                &token(),
                "shop",
                &[
                    SnapshotFile::new("bad.txt", "x"),
                    SnapshotFile::new("good.txt", "y"),
                ],
            )
            .await
            .expect("sync");

        assert_eq!(report.uploaded, ["good.txt"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].path, "bad.txt");
        assert!(report.failed[0].reason.contains("409"));
    }
}
