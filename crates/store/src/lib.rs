//! Checkout Orders Store - durable order history.
//!
//! # Database
//!
//! A single `orders` table (see [`schema`]) keyed by order ID. Line items and
//! the shipping address are stored as opaque JSON text; the store never
//! parses them.
//!
//! The schema is bootstrapped when the store is constructed, so a freshly
//! created [`PgOrderStore`] is always ready to use:
//!
//! ```no_run
//! use checkout_orders_store::{OrderStore, PgOrderStore, StoreConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = StoreConfig::from_env()?;
//! let store = PgOrderStore::connect(&config).await?;
//! let orders = store.fetch_by_user("user-42").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Concurrency
//!
//! Stores are `Send + Sync` and cheap to clone. There is no in-process
//! locking on the `PostgreSQL` path; the database's single-row atomicity is
//! what keeps concurrent writers apart.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod history;
pub mod memory;
pub mod postgres;
pub mod schema;

use std::future::Future;

use checkout_orders_core::OrderRecord;

pub use config::{ConfigError, StoreConfig};
pub use error::{RecordOrderError, StoreError, is_connectivity_error};
pub use history::OrderHistory;
pub use memory::MemoryOrderStore;
pub use postgres::{PgOrderStore, create_pool};

/// Persistence operations on order records.
pub trait OrderStore: Send + Sync {
    /// Make sure the orders table exists. Safe to call repeatedly.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Schema` if bootstrap fails.
    fn ensure_schema(&self) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Insert `record` as a new order. The store assigns `created_at`.
    ///
    /// # Errors
    ///
    /// - `StoreError::Invalid` if a required field is empty (see
    ///   [`OrderRecord::first_empty_field`]).
    /// - `StoreError::DuplicateKey` if an order with the same ID exists.
    /// - `StoreError::Unavailable` / `StoreError::Timeout` if the database
    ///   cannot be reached in time.
    fn persist(&self, record: &OrderRecord) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// All orders for `user_id`, newest first. Empty if the user has none.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` / `StoreError::Timeout` if the
    /// database cannot be reached in time.
    fn fetch_by_user(
        &self,
        user_id: &str,
    ) -> impl Future<Output = Result<Vec<OrderRecord>, StoreError>> + Send;

    /// Check the database answers.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if it does not.
    fn ping(&self) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Stop accepting calls and release held connections.
    ///
    /// Every clone of the store is closed; later calls fail with
    /// `StoreError::Unavailable`.
    fn close(&self) -> impl Future<Output = ()> + Send;
}
