//! LUMINA CLI - catalog and repository sync tools.
//!
//! # Usage
//!
//! ```bash
//! # List the whole catalog
//! lumina-cli catalog
//!
//! # List one category
//! lumina-cli catalog --category boots
//!
//! # Push the workspace sources to GitHub (token from GITHUB_TOKEN)
//! lumina-cli sync --repo lumina-footwear --root .
//! ```
//!
//! # Commands
//!
//! - `catalog` - Print catalog entries
//! - `sync` - Push a snapshot of local files to a GitHub repository

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lumina-cli")]
#[command(author, version, about = "LUMINA CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the shoe catalog
    Catalog {
        /// Only show this category (e.g. boots, heels); `all` shows everything
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Push local source files to a GitHub repository
    Sync {
        /// Personal access token with `repo` scope
        #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: String,

        /// Repository to create or update (default: `GITHUB_DEFAULT_REPO`)
        #[arg(short, long)]
        repo: Option<String>,

        /// Directory the paths are relative to
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// File to include; repeat for more (default: the storefront sources)
        #[arg(short, long = "path")]
        paths: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lumina_cli=info,lumina_storefront=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Catalog { category } => commands::catalog::list(category.as_deref())?,
        Commands::Sync {
            token,
            repo,
            root,
            paths,
        } => {
            commands::sync::push(token.into(), repo, root, paths).await?;
        }
    }
    Ok(())
}
