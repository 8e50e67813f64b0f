//! Conversion from checkout inputs to a storable [`OrderRecord`].
//!
//! Nested structures (line items, shipping address) are flattened into JSON
//! text so the record maps onto a single row. Building a record has no side
//! effects beyond reading the clock.

use chrono::Utc;
use serde::Serialize;

use crate::types::money::{Money, money_to_string};
use crate::types::record::OrderRecord;

/// A line item list or address could not be encoded.
#[derive(thiserror::Error, Debug)]
#[error("failed to encode {field}: {source}")]
pub struct EncodingError {
    /// Which record field was being encoded (`items` or `shipping_address`).
    pub field: &'static str,
    /// The underlying serializer error.
    #[source]
    pub source: serde_json::Error,
}

fn encode<T: Serialize + ?Sized>(field: &'static str, value: &T) -> Result<String, EncodingError> {
    serde_json::to_string(value).map_err(|source| EncodingError { field, source })
}

/// Build an order record from a completed checkout.
///
/// `total_cost` of `None` is recorded as `"0.00"` with an empty currency.
/// `created_at` is set to now; the store replaces it with its own insertion
/// time when the record is persisted.
///
/// # Errors
///
/// Returns `EncodingError` for the first of `line_items` / `address` that
/// fails to serialize. No record is produced in that case.
pub fn build_record<I, A>(
    order_id: &str,
    user_id: &str,
    email: &str,
    total_cost: Option<&Money>,
    line_items: &[I],
    address: &A,
) -> Result<OrderRecord, EncodingError>
where
    I: Serialize,
    A: Serialize + ?Sized,
{
    let items = encode("items", line_items)?;
    let shipping_address = encode("shipping_address", address)?;

    Ok(OrderRecord {
        id: order_id.to_owned(),
        user_id: user_id.to_owned(),
        email: email.to_owned(),
        total_cost: money_to_string(total_cost),
        currency: total_cost
            .map(|m| m.currency_code.clone())
            .unwrap_or_default(),
        items,
        shipping_address,
        created_at: Utc::now(),
    })
}
