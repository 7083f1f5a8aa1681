use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderReference, OrderStatus, PaymentStatus},
    traits::OrderGatewayError,
};

/// Inserts a new order in `pending`/`pending` state. A clash on the unique `reference` column is reported as
/// [`OrderGatewayError::OrderAlreadyExists`].
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, OrderGatewayError> {
    let reference = order.reference.clone();
    let result: Result<Order, sqlx::Error> = sqlx::query_as(
        r#"
            INSERT INTO orders (user_id, reference, payment_mode, buyer_name, address, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(order.user_id)
    .bind(order.reference)
    .bind(order.payment_mode)
    .bind(order.buyer_name)
    .bind(order.address)
    .bind(order.notes)
    .fetch_one(conn)
    .await;
    match result {
        Ok(order) => {
            debug!("🗃️ Order [{}] inserted with id {}", order.reference, order.id);
            Ok(order)
        },
        Err(e) if e.as_database_error().map(|d| d.is_unique_violation()).unwrap_or(false) => {
            Err(OrderGatewayError::OrderAlreadyExists(reference))
        },
        Err(e) => Err(e.into()),
    }
}

/// Fetches an order scoped to its owner. Absent and not-owned are indistinguishable to the caller.
pub async fn fetch_order_for_user(
    order_id: i64,
    user_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1 AND user_id = $2")
        .bind(order_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await
}

pub async fn fetch_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id).fetch_optional(conn).await
}

pub async fn fetch_order_by_reference(
    reference: &OrderReference,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE reference = $1")
        .bind(reference.as_str())
        .fetch_optional(conn)
        .await
}

/// All orders for a user, newest first.
pub async fn fetch_orders_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC")
        .bind(user_id)
        .fetch_all(conn)
        .await
}

/// Every order in the system, newest first, optionally filtered by payment status.
pub async fn fetch_all_orders(
    payment_status: Option<PaymentStatus>,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    match payment_status {
        Some(status) => {
            sqlx::query_as("SELECT * FROM orders WHERE payment_status = $1 ORDER BY created_at DESC, id DESC")
                .bind(status)
                .fetch_all(conn)
                .await
        },
        None => sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC, id DESC").fetch_all(conn).await,
    }
}

/// The atomic check-and-set at the heart of the idempotence guard: the UPDATE only matches while the order is still
/// `pending`, so of two racing confirmations exactly one gets the row back.
pub async fn mark_paid(
    reference: &OrderReference,
    transaction_code: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as(
        r#"
            UPDATE orders
            SET payment_status = 'done', transaction_code = $1, updated_at = CURRENT_TIMESTAMP
            WHERE reference = $2 AND payment_status = 'pending'
            RETURNING *;
        "#,
    )
    .bind(transaction_code)
    .bind(reference.as_str())
    .fetch_optional(conn)
    .await
}

pub async fn update_order_status(
    order_id: i64,
    status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderGatewayError> {
    let result: Option<Order> = sqlx::query_as(
        "UPDATE orders SET order_status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *",
    )
    .bind(status)
    .bind(order_id)
    .fetch_optional(conn)
    .await?;
    result.ok_or(OrderGatewayError::OrderNotFound)
}

pub async fn delete_order(order_id: i64, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM orders WHERE id = $1").bind(order_id).execute(conn).await?;
    Ok(())
}
