//! Show a user's order history.
//!
//! # Usage
//!
//! ```bash
//! orders-cli history --user user-42
//! orders-cli history --user user-42 --json
//! ```

use checkout_orders_core::OrderRecord;
use checkout_orders_store::{OrderHistory, OrderStore};

use super::CommandError;
use super::store::connect;

/// Print the orders for `user_id`, newest first.
pub async fn show(user_id: &str, json: bool) -> Result<(), CommandError> {
    let orders = fetch_orders(connect().await?, user_id).await?;

    let output = if json {
        serde_json::to_string_pretty(&orders).map_err(CommandError::Render)?
    } else if orders.is_empty() {
        format!("No orders for {user_id}")
    } else {
        orders.iter().map(summary_line).collect::<Vec<_>>().join("\n")
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}

/// Fetch the orders for `user_id`, closing `store` afterwards whether or not
/// the fetch succeeded.
async fn fetch_orders<S: OrderStore>(
    store: S,
    user_id: &str,
) -> Result<Vec<OrderRecord>, CommandError> {
    let history = OrderHistory::new(store);
    let result = history.orders_for_user(user_id).await;
    history.store().close().await;
    Ok(result?)
}

/// One line per order: time, ID, total, and item count.
fn summary_line(order: &OrderRecord) -> String {
    let items = order
        .decode_items::<Vec<serde_json::Value>>()
        .map_or_else(|_| "?".to_owned(), |items| items.len().to_string());

    format!(
        "{}  {}  {} {}  {} item(s)",
        order.created_at.format("%Y-%m-%d %H:%M:%S"),
        order.id,
        order.total_cost,
        order.currency,
        items
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use checkout_orders_store::MemoryOrderStore;
    use chrono::{TimeZone, Utc};

    use super::*;

    fn order(items: &str) -> OrderRecord {
        OrderRecord {
            id: "o-1".to_owned(),
            user_id: "u-1".to_owned(),
            email: "someone@example.com".to_owned(),
            total_cost: "19.99".to_owned(),
            currency: "USD".to_owned(),
            items: items.to_owned(),
            shipping_address: "{}".to_owned(),
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).single().unwrap_or_default(),
        }
    }

    #[tokio::test]
    async fn test_fetch_closes_store() {
        let store = MemoryOrderStore::new();
        store.persist(&order("[]")).await.unwrap();

        let orders = fetch_orders(store.clone(), "u-1").await.unwrap();
        assert_eq!(orders.len(), 1);
        assert!(store.is_closed());
    }

    #[tokio::test]
    async fn test_failed_fetch_still_closes_store() {
        let store = MemoryOrderStore::new();
        store.set_unavailable(true);

        let err = fetch_orders(store.clone(), "u-1").await.unwrap_err();
        assert!(matches!(err, CommandError::Store(_)));
        assert!(store.is_closed());
    }

    #[test]
    fn test_summary_line() {
        let line = summary_line(&order(r#"[{"product_id":"A","quantity":1},{"product_id":"B","quantity":2}]"#));
        assert_eq!(line, "2026-03-01 12:30:00  o-1  19.99 USD  2 item(s)");
    }

    #[test]
    fn test_summary_line_with_undecodable_items() {
        let line = summary_line(&order("not json"));
        assert!(line.ends_with("? item(s)"));
    }
}
