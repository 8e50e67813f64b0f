//! Subcommand implementations.

pub mod history;
pub mod record;
pub mod store;

use std::path::PathBuf;

use checkout_orders_core::CurrencyCodeError;
use checkout_orders_store::{ConfigError, RecordOrderError, StoreError};
use thiserror::Error;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "checkout_orders_cli=info,checkout_orders_store=info";

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Could not record order: {0}")]
    Record(#[from] RecordOrderError),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid checkout document: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Invalid total cost: {0}")]
    Currency(#[from] CurrencyCodeError),

    #[error("Failed to render output: {0}")]
    Render(#[source] serde_json::Error),
}
