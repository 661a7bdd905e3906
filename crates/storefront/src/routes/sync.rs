//! Repository sync dialog route handlers.
//!
//! The dialog pushes a snapshot of the storefront's own source, plus the
//! rendered store page, to a GitHub repository owned by the token holder.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State};
use lumina_core::{Action, SnapshotFile};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::models::dispatch;
use crate::routes::home;
use crate::services::{FailedUpload, SyncReport};
use crate::state::AppState;

/// Path of the rendered store page in the pushed repository.
pub const INDEX_PATH: &str = "index.html";

/// Outcome of a successful push, for templates.
#[derive(Clone)]
pub struct SyncResultView {
    pub repo_url: String,
    pub uploaded: usize,
    pub failed: Vec<FailedUpload>,
}

impl From<SyncReport> for SyncResultView {
    fn from(report: SyncReport) -> Self {
        Self {
            repo_url: report.repo_url,
            uploaded: report.uploaded.len(),
            failed: report.failed,
        }
    }
}

/// Dialog display data for templates.
#[derive(Clone)]
pub struct SyncView {
    pub files: Vec<String>,
    pub repo_name: String,
    pub error: Option<String>,
    pub result: Option<SyncResultView>,
}

impl SyncView {
    fn new(files: &[SnapshotFile], repo_name: String) -> Self {
        Self {
            files: files.iter().map(|f| f.path.clone()).collect(),
            repo_name,
            error: None,
            result: None,
        }
    }
}

/// Sync form data. The token is never echoed back.
#[derive(Default, Deserialize)]
pub struct SyncForm {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub repo_name: String,
}

impl SyncForm {
    /// Check required fields, returning the form error to show.
    ///
    /// # Errors
    ///
    /// Returns the message for the first missing field.
    pub fn validate(&self) -> std::result::Result<(), &'static str> {
        if self.token.trim().is_empty() {
            return Err("Token is required");
        }
        if self.repo_name.trim().is_empty() {
            return Err("Repository name is required");
        }
        Ok(())
    }
}

/// Sync dialog fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/sync_dialog.html")]
pub struct SyncDialogTemplate {
    pub open: bool,
    pub sync: SyncView,
}

/// Gather the snapshot and put the rendered store page first.
async fn gather(state: &AppState) -> Result<Vec<SnapshotFile>> {
    let mut files = vec![SnapshotFile::new(INDEX_PATH, home::render_fresh(state)?)];
    files.extend(state.snapshot().gather().await);
    Ok(files)
}

/// Open the dialog with a preview of the files to push.
#[instrument(skip(state, session))]
pub async fn open(State(state): State<AppState>, session: Session) -> Result<SyncDialogTemplate> {
    dispatch(&session, state.config().quantity_policy, Action::OpenSync).await?;
    let files = gather(&state).await?;

    Ok(SyncDialogTemplate {
        open: true,
        sync: SyncView::new(&files, state.config().github.default_repo.clone()),
    })
}

/// Push the snapshot.
///
/// Validation errors and fatal sync errors are rendered in the form; per-file
/// failures are listed alongside the repository URL.
#[instrument(skip(state, form), fields(repo = %form.repo_name))]
pub async fn submit(
    State(state): State<AppState>,
    Form(form): Form<SyncForm>,
) -> Result<SyncDialogTemplate> {
    let files = gather(&state).await?;
    let repo_name = form.repo_name.trim().to_string();
    let mut sync = SyncView::new(&files, repo_name.clone());

    if let Err(message) = form.validate() {
        sync.error = Some(message.to_string());
        return Ok(SyncDialogTemplate { open: true, sync });
    }

    add_breadcrumb("sync", "Repository sync started", Some(&[("repo", repo_name.as_str())]));

    let token = SecretString::from(form.token.trim().to_string());
    match state.github().sync(&token, &repo_name, &files).await {
        Ok(report) => sync.result = Some(SyncResultView::from(report)),
        Err(e) => {
            tracing::warn!(error = %e, "Repository sync failed");
            sync.error = Some(e.to_string());
        }
    }

    Ok(SyncDialogTemplate { open: true, sync })
}

/// Close the dialog.
#[instrument(skip(state, session))]
pub async fn close(State(state): State<AppState>, session: Session) -> Result<SyncDialogTemplate> {
    dispatch(&session, state.config().quantity_policy, Action::CloseSync).await?;

    Ok(SyncDialogTemplate {
        open: false,
        sync: SyncView::new(&[], String::new()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(token: &str, repo_name: &str) -> SyncForm {
        SyncForm {
            token: token.to_string(),
            repo_name: repo_name.to_string(),
        }
    }

    #[test]
    fn test_validate_requires_token_first() {
        assert_eq!(form("", "").validate(), Err("Token is required"));
        assert_eq!(form("  ", "lumina").validate(), Err("Token is required"));
        assert_eq!(
            form("ghp_x", " ").validate(),
            Err("Repository name is required")
        );
        assert_eq!(form("ghp_x", "lumina").validate(), Ok(()));
    }

    #[test]
    fn test_sync_view_lists_files() {
        let view = SyncView::new(
            &[SnapshotFile::new("index.html", "<html>")],
            "lumina".to_string(),
        );
        assert_eq!(view.files, ["index.html"]);
        assert!(view.error.is_none());
    }
}
