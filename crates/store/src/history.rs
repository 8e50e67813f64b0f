//! Order history service used by the checkout and account flows.

use checkout_orders_core::{CheckoutOutcome, OrderRecord};

use crate::OrderStore;
use crate::error::{RecordOrderError, StoreError};

/// Records completed checkouts and answers history queries.
///
/// Holds the store handle it was given at startup; create one per process
/// and pass it (or clones of the store) to whatever needs it.
#[derive(Debug, Clone)]
pub struct OrderHistory<S> {
    store: S,
}

impl<S: OrderStore> OrderHistory<S> {
    /// Create a history service over `store`.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Get a reference to the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Persist a completed checkout.
    ///
    /// Returns the record as built; its `created_at` is the build time, the
    /// stored copy carries the store's insertion time.
    ///
    /// # Errors
    ///
    /// Returns `RecordOrderError::Encoding` if the checkout cannot be encoded
    /// and `RecordOrderError::Store` if the store rejects or cannot take it.
    /// The checkout itself is unaffected either way.
    pub async fn record(&self, outcome: &CheckoutOutcome) -> Result<OrderRecord, RecordOrderError> {
        let result = self.try_record(outcome).await;

        match &result {
            Ok(record) => {
                tracing::info!(
                    order_id = %record.id,
                    user_id = %record.user_id,
                    total_cost = %record.total_cost,
                    currency = %record.currency,
                    "Order recorded"
                );
            }
            Err(e) => {
                tracing::warn!(
                    order_id = %outcome.order_id,
                    user_id = %outcome.user_id,
                    retryable = e.is_retryable(),
                    error = %e,
                    "Failed to record order"
                );
            }
        }

        result
    }

    async fn try_record(&self, outcome: &CheckoutOutcome) -> Result<OrderRecord, RecordOrderError> {
        let record = outcome.to_record()?;
        self.store.persist(&record).await?;
        Ok(record)
    }

    /// All orders for `user_id`, newest first.
    ///
    /// The `items` and `shipping_address` of each record are still encoded.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the store cannot be queried.
    pub async fn orders_for_user(&self, user_id: &str) -> Result<Vec<OrderRecord>, StoreError> {
        self.store.fetch_by_user(user_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use checkout_orders_core::{Address, LineItem, Money};

    use super::*;
    use crate::MemoryOrderStore;

    fn outcome(order_id: &str) -> CheckoutOutcome {
        CheckoutOutcome {
            order_id: order_id.to_owned(),
            user_id: "u-1".to_owned(),
            email: "someone@example.com".to_owned(),
            total_cost: Some(Money::new("USD", 19, 990_000_000)),
            items: vec![LineItem {
                product_id: "OLJCESPC7Z".to_owned(),
                quantity: 1,
                cost: Some(Money::new("USD", 19, 990_000_000)),
            }],
            address: Address::default(),
        }
    }

    #[tokio::test]
    async fn test_record_then_list() {
        let history = OrderHistory::new(MemoryOrderStore::new());
        let built = history.record(&outcome("o-1")).await.unwrap();
        assert_eq!(built.total_cost, "19.99");

        let orders = history.orders_for_user("u-1").await.unwrap();
        assert_eq!(orders.len(), 1);
        assert!(orders.first().unwrap().same_contents(&built));
    }

    #[tokio::test]
    async fn test_record_surfaces_duplicate() {
        let history = OrderHistory::new(MemoryOrderStore::new());
        history.record(&outcome("o-1")).await.unwrap();

        let err = history.record(&outcome("o-1")).await.unwrap_err();
        assert!(matches!(
            err,
            RecordOrderError::Store(StoreError::DuplicateKey { .. })
        ));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_record_surfaces_outage_as_retryable() {
        let store = MemoryOrderStore::new();
        store.set_unavailable(true);
        let history = OrderHistory::new(store);

        let err = history.record(&outcome("o-1")).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(history.store().is_empty());
    }

    #[tokio::test]
    async fn test_record_without_total_is_stored_as_zero() {
        let history = OrderHistory::new(MemoryOrderStore::new());
        let mut without_total = outcome("o-1");
        without_total.total_cost = None;

        let built = history.record(&without_total).await.unwrap();
        assert_eq!(built.total_cost, "0.00");
        assert_eq!(built.currency, "");

        let orders = history.orders_for_user("u-1").await.unwrap();
        assert_eq!(orders.len(), 1);
        assert!(orders.first().unwrap().same_contents(&built));
    }

    #[tokio::test]
    async fn test_record_rejects_missing_currency_on_nonzero_total() {
        let history = OrderHistory::new(MemoryOrderStore::new());
        let mut no_currency = outcome("o-1");
        no_currency.total_cost = Some(Money::new("", 5, 0));

        let err = history.record(&no_currency).await.unwrap_err();
        assert!(matches!(
            err,
            RecordOrderError::Store(StoreError::Invalid { field: "currency" })
        ));
        assert!(history.store().is_empty());
    }
}
