//! Table definition for persisted orders.
//!
//! The schema is bootstrapped in place rather than through migrations:
//! every statement is `IF NOT EXISTS`, so running them on each startup is
//! harmless.

/// Name of the orders table.
pub const ORDERS_TABLE: &str = "orders";

/// Advisory lock key serialising concurrent bootstraps (ASCII "orders").
pub const SCHEMA_LOCK_KEY: i64 = 0x6f72_6465_7273;

/// Create the orders table.
pub const CREATE_ORDERS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS orders (
        id VARCHAR(255) PRIMARY KEY,
        user_id VARCHAR(255) NOT NULL,
        email VARCHAR(255) NOT NULL,
        total_cost VARCHAR(50) NOT NULL,
        currency VARCHAR(10) NOT NULL,
        items TEXT NOT NULL,
        shipping_address TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
";

/// Index serving the per-user, newest-first history query.
pub const CREATE_USER_HISTORY_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS orders_user_id_created_at_idx
        ON orders (user_id, created_at DESC)
";

/// Bootstrap statements, in execution order.
#[must_use]
pub const fn bootstrap_statements() -> [&'static str; 2] {
    [CREATE_ORDERS_TABLE, CREATE_USER_HISTORY_INDEX]
}

/// Insert one order; `created_at` is left to the column default.
pub(crate) const INSERT_ORDER: &str = r"
    INSERT INTO orders (id, user_id, email, total_cost, currency, items, shipping_address)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
";

/// All orders for a user, newest first.
pub(crate) const SELECT_ORDERS_BY_USER: &str = r"
    SELECT id, user_id, email, total_cost, currency, items, shipping_address, created_at
    FROM orders
    WHERE user_id = $1
    ORDER BY created_at DESC
";
