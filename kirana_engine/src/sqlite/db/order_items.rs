use sqlx::SqliteConnection;

use crate::db_types::{OrderItem, Product};

/// Inserts an order line, snapshotting the product's current price, title and description. The snapshot decouples
/// the line from later catalog edits.
pub async fn insert_item(
    order_id: i64,
    product: &Product,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, sqlx::Error> {
    sqlx::query_as(
        r#"
            INSERT INTO order_items (order_id, product_id, price, product_name, product_description, quantity)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(product.id)
    .bind(product.price)
    .bind(product.title.as_str())
    .bind(product.short_description.as_str())
    .bind(quantity)
    .fetch_one(conn)
    .await
}

pub async fn fetch_items_for_order(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_items WHERE order_id = $1 ORDER BY id ASC")
        .bind(order_id)
        .fetch_all(conn)
        .await
}

pub async fn delete_items_for_order(order_id: i64, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM order_items WHERE order_id = $1").bind(order_id).execute(conn).await?;
    Ok(())
}
