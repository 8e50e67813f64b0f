//! Checkout inputs handed over by the checkout workflow.
//!
//! These mirror what the checkout service has assembled by the time an order
//! is confirmed: the purchased items with their unit prices, the shipping
//! address, and the computed total.

use serde::{Deserialize, Serialize};

use super::money::Money;
use super::record::OrderRecord;
use crate::codec::{EncodingError, build_record};

/// A purchased product and the unit price it was charged at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Catalog product identifier.
    pub product_id: String,
    /// Number of units purchased.
    pub quantity: i32,
    /// Unit cost in the user's currency.
    #[serde(default)]
    pub cost: Option<Money>,
}

/// Structured shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Address {
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: i32,
}

/// Everything needed to record one completed checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutOutcome {
    /// Order identifier issued by the checkout workflow. Empty if not yet assigned.
    #[serde(default)]
    pub order_id: String,
    pub user_id: String,
    pub email: String,
    /// Total charged, including shipping. `None` is recorded as zero.
    #[serde(default)]
    pub total_cost: Option<Money>,
    pub items: Vec<LineItem>,
    pub address: Address,
}

impl CheckoutOutcome {
    /// Convert into a storable [`OrderRecord`].
    ///
    /// # Errors
    ///
    /// Returns `EncodingError` if the items or address cannot be encoded.
    pub fn to_record(&self) -> Result<OrderRecord, EncodingError> {
        build_record(
            &self.order_id,
            &self.user_id,
            &self.email,
            self.total_cost.as_ref(),
            &self.items,
            &self.address,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_deserializes_without_total() {
        let json = r#"{
            "order_id": "o-1",
            "user_id": "u-1",
            "email": "someone@example.com",
            "items": [{"product_id": "OLJCESPC7Z", "quantity": 2}],
            "address": {
                "street_address": "1600 Amphitheatre Parkway",
                "city": "Mountain View",
                "state": "CA",
                "country": "United States",
                "zip_code": 94043
            }
        }"#;

        let outcome: CheckoutOutcome = serde_json::from_str(json).unwrap();
        assert!(outcome.total_cost.is_none());
        assert_eq!(outcome.items.len(), 1);
        assert!(outcome.items.iter().all(|item| item.cost.is_none()));

        let record = outcome.to_record().unwrap();
        assert_eq!(record.total_cost, "0.00");
        assert_eq!(record.currency, "");
    }

    #[test]
    fn test_to_record_copies_identity() {
        let outcome = CheckoutOutcome {
            order_id: "o-2".to_owned(),
            user_id: "u-2".to_owned(),
            email: "buyer@example.com".to_owned(),
            total_cost: Some(Money::new("EUR", 42, 500_000_000)),
            items: vec![],
            address: Address::default(),
        };

        let record = outcome.to_record().unwrap();
        assert_eq!(record.id, "o-2");
        assert_eq!(record.user_id, "u-2");
        assert_eq!(record.email, "buyer@example.com");
        assert_eq!(record.total_cost, "42.50");
        assert_eq!(record.currency, "EUR");
        assert_eq!(record.items, "[]");
    }
}
