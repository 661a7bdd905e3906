//! Repository sync from a local checkout.
//!
//! # Usage
//!
//! ```bash
//! GITHUB_TOKEN=ghp_... lumina-cli sync --repo lumina-footwear
//! lumina-cli sync --token ghp_... --root ../site --path index.html --path app.css
//! ```
//!
//! # Environment Variables
//!
//! - `GITHUB_TOKEN` - Token used when `--token` is not given
//! - `GITHUB_DEFAULT_REPO` - Repository used when `--repo` is not given
//! - `GITHUB_API_BASE`, `GITHUB_WEB_BASE` - API and web origins

use std::io::{self, Write};
use std::path::PathBuf;

use lumina_storefront::config::{DEFAULT_SNAPSHOT_PATHS, GithubConfig};
use lumina_storefront::services::{
    DirectorySource, GithubClient, GithubError, SnapshotGatherer, SyncReport,
};
use secrecy::SecretString;
use thiserror::Error;

/// Errors that abort a sync.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Github(#[from] GithubError),

    #[error("No files could be read under {0}")]
    NothingToPush(String),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Gather `paths` under `root` and push them to `repo`.
///
/// The repository URL and any per-file upload failures are printed to
/// stdout; upload failures do not fail the command.
///
/// # Errors
///
/// Returns an error if the token is rejected, the repository cannot be
/// created, or none of the paths could be read.
pub async fn push(
    token: SecretString,
    repo: Option<String>,
    root: PathBuf,
    paths: Vec<String>,
) -> Result<(), SyncError> {
    let config = GithubConfig::from_env();
    let repo = repo.unwrap_or_else(|| config.default_repo.clone());
    let paths = if paths.is_empty() {
        DEFAULT_SNAPSHOT_PATHS.iter().map(ToString::to_string).collect()
    } else {
        paths
    };

    let requested = paths.len();
    let gatherer = SnapshotGatherer::new(DirectorySource::new(&root), paths);
    let files = gatherer.gather().await;

    // The generated metadata file is always present.
    if files.len() <= 1 {
        return Err(SyncError::NothingToPush(root.display().to_string()));
    }
    tracing::info!(
        read = files.len() - 1,
        requested,
        root = %root.display(),
        "Gathered snapshot"
    );

    let client = GithubClient::new(&config)?;
    let report = client.sync(&token, &repo, &files).await?;

    let mut out = io::stdout().lock();
    write_report(&mut out, &report)?;
    Ok(())
}

fn write_report(out: &mut impl Write, report: &SyncReport) -> io::Result<()> {
    writeln!(
        out,
        "Pushed {} files to {}",
        report.uploaded.len(),
        report.repo_url
    )?;
    if !report.failed.is_empty() {
        writeln!(out, "Not uploaded:")?;
        for failure in &report.failed {
            writeln!(out, "  {}  {}", failure.path, failure.reason)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use lumina_storefront::services::FailedUpload;

    use super::*;

    fn report(failed: Vec<FailedUpload>) -> SyncReport {
        SyncReport {
            repo_url: "https://github.com/octo/lumina-footwear".to_string(),
            uploaded: vec!["index.html".to_string(), "metadata.json".to_string()],
            failed,
        }
    }

    #[test]
    fn test_write_report_success() {
        let mut buf = Vec::new();
        write_report(&mut buf, &report(Vec::new())).expect("write");

        let text = String::from_utf8(buf).expect("utf-8");
        assert_eq!(
            text,
            "Pushed 2 files to https://github.com/octo/lumina-footwear\n"
        );
    }

    #[test]
    fn test_write_report_lists_failures() {
        let failed = vec![FailedUpload {
            path: "Cargo.toml".to_string(),
            reason: "upload rejected (409): conflict".to_string(),
        }];
        let mut buf = Vec::new();
        write_report(&mut buf, &report(failed)).expect("write");

        let text = String::from_utf8(buf).expect("utf-8");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Not uploaded:");
        assert_eq!(lines[2], "  Cargo.toml  upload rejected (409): conflict");
    }
}
