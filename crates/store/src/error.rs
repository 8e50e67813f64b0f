//! Error types for order storage.

use std::time::Duration;

use checkout_orders_core::EncodingError;
use thiserror::Error;

/// SQLSTATE classes and codes that mean the server went away mid-call.
const CONNECTION_EXCEPTION_CLASS: &str = "08";
const SERVER_SHUTDOWN_CODES: [&str; 3] = ["57P01", "57P02", "57P03"];

/// Errors that can occur during order store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database could not be opened or reached while constructing the store.
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// Schema bootstrap failed.
    #[error("schema bootstrap failed: {0}")]
    Schema(#[source] sqlx::Error),

    /// An order with this ID already exists.
    #[error("duplicate order id: {id}")]
    DuplicateKey {
        /// The conflicting order ID.
        id: String,
    },

    /// A required field was empty.
    #[error("invalid order record: {field} must not be empty")]
    Invalid {
        /// Name of the empty field.
        field: &'static str,
    },

    /// The database could not be reached during a call.
    #[error("database unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// The call did not finish within the configured query timeout.
    #[error("database call timed out after {0:?}")]
    Timeout(Duration),

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Whether the same call may succeed if retried later.
    ///
    /// Only connectivity problems qualify; duplicate IDs and invalid records
    /// fail the same way every time.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Unavailable(_) | Self::Timeout(_)
        )
    }

    /// Reclassify a failed liveness probe made while constructing a store.
    ///
    /// Any failure to get an answer means the database could not be reached.
    pub(crate) fn at_construction_probe(self) -> Self {
        match self {
            Self::Unavailable(err) | Self::Database(err) => Self::Connection(err),
            Self::Timeout(_) => Self::Connection(sqlx::Error::PoolTimedOut),
            other => other,
        }
    }

    /// Reclassify a failed schema bootstrap made while constructing a store.
    pub(crate) fn at_construction_bootstrap(self) -> Self {
        match self {
            Self::Timeout(_) => Self::Schema(sqlx::Error::PoolTimedOut),
            other => other,
        }
    }

    /// Classify an error from a regular store call.
    pub(crate) fn from_call(err: sqlx::Error) -> Self {
        if is_connectivity_error(&err) {
            Self::Unavailable(err)
        } else {
            Self::Database(err)
        }
    }

    /// Classify an error from an insert of the order with `id`.
    pub(crate) fn from_insert(err: sqlx::Error, id: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err
            && db_err.is_unique_violation()
        {
            return Self::DuplicateKey { id: id.to_owned() };
        }
        Self::from_call(err)
    }
}

/// Whether `err` means the database could not be reached, as opposed to the
/// database rejecting the statement.
#[must_use]
pub fn is_connectivity_error(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| {
            code.starts_with(CONNECTION_EXCEPTION_CLASS)
                || SERVER_SHUTDOWN_CODES.iter().any(|c| code == *c)
        }),
        _ => false,
    }
}

/// Failure to record a checkout in order history.
///
/// Either way the checkout itself has already happened; callers decide
/// whether to retry (see [`is_retryable`](Self::is_retryable)).
#[derive(Debug, Error)]
pub enum RecordOrderError {
    /// The items or address could not be encoded.
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// The store rejected or could not take the record.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RecordOrderError {
    /// Whether retrying the same checkout may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Encoding(_) => false,
            Self::Store(err) => err.is_retryable(),
        }
    }
}
