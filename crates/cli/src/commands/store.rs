//! Store lifecycle commands.
//!
//! # Usage
//!
//! ```bash
//! orders-cli schema
//! orders-cli ping
//! ```

use checkout_orders_store::{OrderStore, PgOrderStore, StoreConfig};

use super::CommandError;

/// Load configuration and connect. Connecting bootstraps the schema.
pub async fn connect() -> Result<PgOrderStore, CommandError> {
    let config = StoreConfig::from_env()?;

    tracing::info!("Connecting to orders database...");
    let store = PgOrderStore::connect(&config).await?;
    Ok(store)
}

/// Bootstrap the orders schema.
pub async fn schema() -> Result<(), CommandError> {
    let store = connect().await?;
    // Already bootstrapped by connect; a second pass confirms it is idempotent.
    let result = store.ensure_schema().await;
    store.close().await;
    result?;

    tracing::info!("Orders schema is up to date");
    Ok(())
}

/// Run the liveness probe.
pub async fn ping() -> Result<(), CommandError> {
    let store = connect().await?;
    let result = store.ping().await;
    store.close().await;
    result?;

    #[allow(clippy::print_stdout)]
    {
        println!("ok");
    }
    Ok(())
}
