//! Backroom CLI - session and catalog inspection tools.
//!
//! # Usage
//!
//! ```bash
//! # Confirm the stored session is still accepted by the backend
//! backroom session check
//!
//! # Show the locally cached user profile
//! backroom session whoami
//!
//! # Render the tenant's category tree
//! backroom categories tree
//!
//! # List products, optionally filtered by status
//! backroom products list --page 1 --per-page 25 --status active
//! ```
//!
//! Configuration comes from the environment (see `ClientConfig`); the
//! session store lives in the file named by `BACKROOM_SESSION_FILE`
//! (default: `.backroom-session.json`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "backroom")]
#[command(author, version, about = "Backroom CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and validate the stored session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Category catalog tools
    Categories {
        #[command(subcommand)]
        action: CategoriesAction,
    },
    /// Product catalog tools
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Validate the stored token against the backend
    Check,
    /// Print the locally cached user profile
    Whoami,
}

#[derive(Subcommand)]
enum CategoriesAction {
    /// Fetch the tenant's categories and render them as a tree
    Tree,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Rows per page
        #[arg(long, default_value_t = 25)]
        per_page: u32,

        /// Only show products with this status (`draft`, `active`, `archived`)
        #[arg(long)]
        status: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; defaults to info level for our
    // crates if RUST_LOG is not set
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "backroom=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Session { action } => match action {
            SessionAction::Check => commands::session::check().await?,
            SessionAction::Whoami => commands::session::whoami()?,
        },
        Commands::Categories { action } => match action {
            CategoriesAction::Tree => commands::categories::tree().await?,
        },
        Commands::Products { action } => match action {
            ProductsAction::List {
                page,
                per_page,
                status,
            } => commands::products::list(page, per_page, status.as_deref()).await?,
        },
    }
    Ok(())
}
