//! Raw source files read by the snapshot gatherer.
//!
//! Only the configured snapshot paths are served; anything else is a 404.

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::snapshot::resolve_path;
use crate::state::AppState;

/// Serve one snapshot file as plain text.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<impl IntoResponse> {
    let not_found = || AppError::NotFound(format!("source {path}"));

    if !state.snapshot().allows(&path) {
        return Err(not_found());
    }

    let full = resolve_path(&state.config().source_root, &path).map_err(|_| not_found())?;
    let content = tokio::fs::read_to_string(&full).await.map_err(|e| {
        tracing::debug!(path = %full.display(), error = %e, "Source file unreadable");
        not_found()
    })?;

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], content))
}
