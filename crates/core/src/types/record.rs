//! The persisted order record.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Canonical text of a zero (or absent) total.
const ZERO_TOTAL: &str = "0.00";

/// A completed order as stored in the `orders` table.
///
/// `items` and `shipping_address` hold JSON text produced by
/// [`build_record`](crate::codec::build_record). Storage never looks inside
/// them; use [`decode_items`](Self::decode_items) and
/// [`decode_shipping_address`](Self::decode_shipping_address) to get the
/// structured values back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct OrderRecord {
    /// Order identifier (primary key).
    pub id: String,
    pub user_id: String,
    pub email: String,
    /// Canonical two-place decimal text, e.g. "19.99".
    pub total_cost: String,
    /// Currency code of `total_cost`.
    pub currency: String,
    /// Encoded line items.
    pub items: String,
    /// Encoded shipping address.
    pub shipping_address: String,
    /// Insertion time. Assigned by the store when the record is persisted.
    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    /// Names of the fields a persisted record must not leave empty.
    pub const REQUIRED_FIELDS: [&'static str; 5] =
        ["id", "user_id", "email", "total_cost", "currency"];

    /// Returns the first required field that is empty, if any.
    ///
    /// Only the empty string counts as empty. `currency` may be empty when
    /// `total_cost` is zero, which is how an absent amount is recorded.
    #[must_use]
    pub fn first_empty_field(&self) -> Option<&'static str> {
        let values = [
            &self.id,
            &self.user_id,
            &self.email,
            &self.total_cost,
            &self.currency,
        ];
        Self::REQUIRED_FIELDS
            .into_iter()
            .zip(values)
            .filter(|&(name, _)| name != "currency" || !self.is_zero_total())
            .find_map(|(name, value)| value.is_empty().then_some(name))
    }

    /// Whether `total_cost` is the canonical zero amount.
    #[must_use]
    pub fn is_zero_total(&self) -> bool {
        self.total_cost == ZERO_TOTAL
    }

    /// Decode the stored line items.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the blob does not decode as `T`.
    pub fn decode_items<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.items)
    }

    /// Decode the stored shipping address.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the blob does not decode as `T`.
    pub fn decode_shipping_address<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.shipping_address)
    }

    /// Compare everything except `created_at`.
    ///
    /// Records read back from storage carry the store-assigned timestamp, so
    /// this is the equality that survives a round trip.
    #[must_use]
    pub fn same_contents(&self, other: &Self) -> bool {
        self.id == other.id
            && self.user_id == other.user_id
            && self.email == other.email
            && self.total_cost == other.total_cost
            && self.currency == other.currency
            && self.items == other.items
            && self.shipping_address == other.shipping_address
    }
}
