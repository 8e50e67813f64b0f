//! Record a completed checkout.
//!
//! # Usage
//!
//! ```bash
//! orders-cli record --file checkout.json
//! ```
//!
//! The document is a `CheckoutOutcome`:
//!
//! ```json
//! {
//!   "order_id": "optional, generated when omitted",
//!   "user_id": "user-42",
//!   "email": "someone@example.com",
//!   "total_cost": { "currency_code": "USD", "units": 19, "nanos": 990000000 },
//!   "items": [{ "product_id": "OLJCESPC7Z", "quantity": 1 }],
//!   "address": {
//!     "street_address": "1600 Amphitheatre Parkway",
//!     "city": "Mountain View",
//!     "state": "CA",
//!     "country": "United States",
//!     "zip_code": 94043
//!   }
//! }
//! ```

use std::path::Path;

use checkout_orders_core::{CheckoutOutcome, CurrencyCode, OrderRecord};
use checkout_orders_store::{OrderHistory, OrderStore};
use uuid::Uuid;

use super::CommandError;
use super::store::connect;

/// Read a checkout document from `path` and record it.
pub async fn from_file(path: &Path) -> Result<(), CommandError> {
    let document = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CommandError::Read {
            path: path.to_path_buf(),
            source,
        })?;
    let outcome = parse_outcome(&document)?;
    let record = record_outcome(connect().await?, &outcome).await?;

    #[allow(clippy::print_stdout)]
    {
        println!(
            "Recorded order {} for {}: {} {}",
            record.id, record.user_id, record.total_cost, record.currency
        );
    }
    Ok(())
}

/// Record `outcome`, closing `store` afterwards whether or not it succeeded.
async fn record_outcome<S: OrderStore>(
    store: S,
    outcome: &CheckoutOutcome,
) -> Result<OrderRecord, CommandError> {
    let history = OrderHistory::new(store);
    let result = history.record(outcome).await;
    history.store().close().await;
    Ok(result?)
}

/// Parse a checkout document, assigning an order ID if it has none.
fn parse_outcome(document: &str) -> Result<CheckoutOutcome, CommandError> {
    let mut outcome: CheckoutOutcome =
        serde_json::from_str(document).map_err(CommandError::Parse)?;

    if let Some(total) = &outcome.total_cost {
        CurrencyCode::parse(&total.currency_code)?;
    }

    if outcome.order_id.trim().is_empty() {
        outcome.order_id = Uuid::new_v4().to_string();
        tracing::debug!(order_id = %outcome.order_id, "Generated order ID");
    }

    Ok(outcome)
}
