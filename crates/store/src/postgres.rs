//! `PostgreSQL`-backed order store.

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use checkout_orders_core::OrderRecord;

use crate::OrderStore;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::schema;

/// Create a `PostgreSQL` connection pool from the store configuration.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &StoreConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(config.database_url.expose_secret())
        .await
}

/// Order store over a shared `PostgreSQL` pool.
///
/// Cloning is cheap and clones share the pool, so one instance created at
/// startup can be handed to every task that needs it. Each call is bounded by
/// the configured query timeout; dropping a call's future cancels it and
/// returns its connection to the pool.
#[derive(Debug, Clone)]
pub struct PgOrderStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgOrderStore {
    /// Open a pool, check the database answers, and bootstrap the schema.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Connection` if the database cannot be opened or
    /// does not answer within the query timeout, `StoreError::Schema` if
    /// bootstrap fails or times out.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let pool = create_pool(config)
            .await
            .map_err(StoreError::Connection)?;
        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Database pool created"
        );

        Self::from_pool(pool, config.query_timeout).await
    }

    /// Wrap an existing pool, check the database answers, and bootstrap the schema.
    ///
    /// # Errors
    ///
    /// Same as [`connect`](Self::connect).
    pub async fn from_pool(pool: PgPool, query_timeout: Duration) -> Result<Self, StoreError> {
        let store = Self {
            pool,
            query_timeout,
        };

        store
            .ping()
            .await
            .map_err(StoreError::at_construction_probe)?;
        store
            .ensure_schema()
            .await
            .map_err(StoreError::at_construction_bootstrap)?;

        tracing::info!(table = schema::ORDERS_TABLE, "Order store ready");
        Ok(store)
    }

    /// Get a reference to the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run `fut` under the query timeout.
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, sqlx::Error>>,
    ) -> Result<Result<T, sqlx::Error>, StoreError> {
        tokio::time::timeout(self.query_timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout(self.query_timeout))
    }

    async fn bootstrap(&self) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // Concurrent CREATE ... IF NOT EXISTS can still race on the catalog.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(schema::SCHEMA_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        for statement in schema::bootstrap_statements() {
            sqlx::query(statement).execute(&mut *tx).await?;
        }

        tx.commit().await
    }
}

impl OrderStore for PgOrderStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.bounded(self.bootstrap())
            .await?
            .map_err(StoreError::Schema)?;

        tracing::info!(table = schema::ORDERS_TABLE, "Order schema ensured");
        Ok(())
    }

    async fn persist(&self, record: &OrderRecord) -> Result<(), StoreError> {
        if let Some(field) = record.first_empty_field() {
            return Err(StoreError::Invalid { field });
        }

        let insert = sqlx::query(schema::INSERT_ORDER)
            .bind(&record.id)
            .bind(&record.user_id)
            .bind(&record.email)
            .bind(&record.total_cost)
            .bind(&record.currency)
            .bind(&record.items)
            .bind(&record.shipping_address)
            .execute(&self.pool);

        self.bounded(insert)
            .await?
            .map_err(|e| StoreError::from_insert(e, &record.id))?;

        tracing::debug!(order_id = %record.id, user_id = %record.user_id, "Order persisted");
        Ok(())
    }

    async fn fetch_by_user(&self, user_id: &str) -> Result<Vec<OrderRecord>, StoreError> {
        let select = sqlx::query_as::<_, OrderRecord>(schema::SELECT_ORDERS_BY_USER)
            .bind(user_id)
            .fetch_all(&self.pool);

        let orders = self
            .bounded(select)
            .await?
            .map_err(StoreError::from_call)?;

        tracing::debug!(user_id, count = orders.len(), "Fetched order history");
        Ok(orders)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.bounded(sqlx::query("SELECT 1").execute(&self.pool))
            .await?
            .map_err(StoreError::from_call)?;
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to be returned.
    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Order store closed");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use tokio::net::TcpListener;

    use super::*;

    /// A pool whose server accepts connections and never answers.
    async fn silent_pool() -> PgPool {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(10))
            .connect_lazy(&format!("postgres://orders:orders@{addr}/orders?sslmode=disable"))
            .unwrap()
    }

    fn record(email: &str) -> OrderRecord {
        OrderRecord {
            id: "o-1".to_owned(),
            user_id: "u-1".to_owned(),
            email: email.to_owned(),
            total_cost: "10.00".to_owned(),
            currency: "USD".to_owned(),
            items: "[]".to_owned(),
            shipping_address: "{}".to_owned(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_calls_time_out() {
        let query_timeout = Duration::from_millis(200);
        let store = PgOrderStore {
            pool: silent_pool().await,
            query_timeout,
        };

        let err = store.fetch_by_user("u-1").await.unwrap_err();
        assert!(
            matches!(err, StoreError::Timeout(d) if d == query_timeout),
            "got {err:?}"
        );
        assert!(err.is_retryable());

        let err = store.persist(&record("someone@example.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout(_)), "got {err:?}");

        let err = store.ping().await.unwrap_err();
        assert!(matches!(err, StoreError::Timeout(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_invalid_record_rejected_before_any_call() {
        let store = PgOrderStore {
            pool: silent_pool().await,
            query_timeout: Duration::from_secs(30),
        };

        let err = store.persist(&record("")).await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid { field: "email" }));
    }
}
