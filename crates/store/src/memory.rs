//! In-memory order store.
//!
//! Behaves like [`PgOrderStore`](crate::PgOrderStore) for the contract that
//! matters to callers: unique IDs, store-assigned timestamps, newest-first
//! history. Useful in tests and local tooling where no database is around.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, TimeDelta, Utc};

use checkout_orders_core::OrderRecord;

use crate::OrderStore;
use crate::error::StoreError;

#[derive(Debug, Default)]
struct State {
    /// Records in insertion order.
    records: Vec<OrderRecord>,
    last_created_at: Option<DateTime<Utc>>,
    unavailable: bool,
    closed: bool,
    schema_runs: usize,
}

impl State {
    /// Now, nudged forward so timestamps strictly increase per insert.
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let created_at = match self.last_created_at {
            Some(last) if now <= last => last + TimeDelta::microseconds(1),
            _ => now,
        };
        self.last_created_at = Some(created_at);
        created_at
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable || self.closed {
            return Err(StoreError::Unavailable(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

/// Order store holding records in process memory.
///
/// Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryOrderStore {
    state: Arc<Mutex<State>>,
}

impl MemoryOrderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate losing (or regaining) the database.
    ///
    /// While unavailable every operation fails with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Total number of stored records, across all users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Whether no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether [`close`](OrderStore::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// How many times the schema bootstrap has run.
    #[must_use]
    pub fn schema_runs(&self) -> usize {
        self.lock().schema_runs
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panic while holding the lock cannot leave a half-inserted record.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl OrderStore for MemoryOrderStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let mut state = self.lock();
        state.check_available()?;
        state.schema_runs += 1;
        Ok(())
    }

    async fn persist(&self, record: &OrderRecord) -> Result<(), StoreError> {
        if let Some(field) = record.first_empty_field() {
            return Err(StoreError::Invalid { field });
        }

        let mut state = self.lock();
        state.check_available()?;
        if state.records.iter().any(|r| r.id == record.id) {
            return Err(StoreError::DuplicateKey {
                id: record.id.clone(),
            });
        }

        let mut stored = record.clone();
        stored.created_at = state.next_created_at();
        state.records.push(stored);
        drop(state);

        tracing::debug!(order_id = %record.id, user_id = %record.user_id, "Order persisted");
        Ok(())
    }

    async fn fetch_by_user(&self, user_id: &str) -> Result<Vec<OrderRecord>, StoreError> {
        let state = self.lock();
        state.check_available()?;

        // Newest insert first; the stable sort keeps that order for equal timestamps.
        let mut orders: Vec<OrderRecord> = state
            .records
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        drop(state);
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(orders)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.lock().check_available()
    }

    async fn close(&self) {
        self.lock().closed = true;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(id: &str, user_id: &str) -> OrderRecord {
        OrderRecord {
            id: id.to_owned(),
            user_id: user_id.to_owned(),
            email: "someone@example.com".to_owned(),
            total_cost: "10.00".to_owned(),
            currency: "USD".to_owned(),
            items: "[]".to_owned(),
            shipping_address: "{}".to_owned(),
            created_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    #[tokio::test]
    async fn test_persist_assigns_created_at() {
        let store = MemoryOrderStore::new();
        let before = Utc::now();
        store.persist(&record("o-1", "u-1")).await.unwrap();

        let orders = store.fetch_by_user("u-1").await.unwrap();
        assert_eq!(orders.len(), 1);
        assert!(orders.first().unwrap().created_at >= before);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = MemoryOrderStore::new();
        store.persist(&record("o-1", "u-1")).await.unwrap();

        let err = store.persist(&record("o-1", "u-2")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateKey { ref id } if id == "o-1"));
        assert_eq!(store.len(), 1);
        assert!(store.fetch_by_user("u-2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_record_rejected() {
        let store = MemoryOrderStore::new();
        let mut r = record("o-1", "u-1");
        r.currency = String::new();

        let err = store.persist(&r).await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid { field: "currency" }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_per_user() {
        let store = MemoryOrderStore::new();
        store.persist(&record("o-1", "u-1")).await.unwrap();
        store.persist(&record("o-2", "u-2")).await.unwrap();
        store.persist(&record("o-3", "u-1")).await.unwrap();
        store.persist(&record("o-4", "u-1")).await.unwrap();

        let ids: Vec<String> = store
            .fetch_by_user("u-1")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, ["o-4", "o-3", "o-1"]);
    }

    #[tokio::test]
    async fn test_unavailable() {
        let store = MemoryOrderStore::new();
        store.set_unavailable(true);

        let err = store.persist(&record("o-1", "u-1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(err.is_retryable());
        assert!(store.fetch_by_user("u-1").await.is_err());
        assert!(store.ping().await.is_err());

        store.set_unavailable(false);
        store.persist(&record("o-1", "u-1")).await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_closed_store_stays_closed() {
        let store = MemoryOrderStore::new();
        store.persist(&record("o-1", "u-1")).await.unwrap();
        store.clone().close().await;

        assert!(store.is_closed());
        let err = store.fetch_by_user("u-1").await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(sqlx::Error::PoolClosed)));

        store.set_unavailable(false);
        assert!(store.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_clones_share_records() {
        let store = MemoryOrderStore::new();
        let clone = store.clone();
        clone.persist(&record("o-1", "u-1")).await.unwrap();
        assert_eq!(store.len(), 1);
    }
}
