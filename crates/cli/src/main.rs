//! Checkout Orders CLI - schema bootstrap and order history tools.
//!
//! # Usage
//!
//! ```bash
//! # Create the orders table if it does not exist
//! orders-cli schema
//!
//! # Check the database answers
//! orders-cli ping
//!
//! # Record a completed checkout from a JSON document
//! orders-cli record --file checkout.json
//!
//! # List a user's orders, newest first
//! orders-cli history --user user-42
//! orders-cli history --user user-42 --json
//! ```
//!
//! # Environment Variables
//!
//! See `checkout_orders_store::config`. `RUST_LOG` overrides the default
//! log filter.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "orders-cli")]
#[command(author, version, about = "Checkout order history tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bootstrap the orders schema
    Schema,
    /// Check the database is reachable
    Ping,
    /// Record a completed checkout
    Record {
        /// Path to a JSON checkout document
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Show a user's order history
    History {
        /// User ID
        #[arg(short, long)]
        user: String,

        /// Print the records as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(commands::DEFAULT_LOG_FILTER)),
        )
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
        Commands::Schema => commands::store::schema().await?,
        Commands::Ping => commands::store::ping().await?,
        Commands::Record { file } => commands::record::from_file(&file).await?,
        Commands::History { user, json } => commands::history::show(&user, json).await?,
    }
    Ok(())
}
