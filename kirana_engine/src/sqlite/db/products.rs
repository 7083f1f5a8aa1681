use log::trace;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewProduct, Product},
    traits::OrderGatewayError,
};

pub async fn fetch_product(product_id: i64, conn: &mut SqliteConnection) -> Result<Option<Product>, sqlx::Error> {
    let product =
        sqlx::query_as("SELECT * FROM products WHERE id = $1").bind(product_id).fetch_optional(conn).await?;
    Ok(product)
}

/// Inserts a catalog product. The engine itself never creates products in production; this exists for seeding and
/// test fixtures.
pub async fn insert_product(product: NewProduct, conn: &mut SqliteConnection) -> Result<Product, sqlx::Error> {
    let product = sqlx::query_as(
        r#"
            INSERT INTO products (title, short_description, price, stock)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(product.title)
    .bind(product.short_description)
    .bind(product.price)
    .bind(product.stock)
    .fetch_one(conn)
    .await?;
    Ok(product)
}

/// Reserves stock with a single conditional decrement executed by the storage engine. The `stock >= $1` guard in
/// the WHERE clause is what makes concurrent reservations safe: two orders racing for the last unit cannot both
/// match the row.
pub async fn reserve_stock(
    product_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<(), OrderGatewayError> {
    let result = sqlx::query(
        "UPDATE products SET stock = stock - $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 AND stock >= $1",
    )
    .bind(quantity)
    .bind(product_id)
    .execute(&mut *conn)
    .await?;
    if result.rows_affected() > 0 {
        trace!("🗃️ Reserved {quantity} units of product #{product_id}");
        return Ok(());
    }
    // The guard did not match: either the product is gone or there is not enough stock. Report which.
    match fetch_product(product_id, conn).await? {
        None => Err(OrderGatewayError::ProductNotFound(product_id)),
        Some(p) => Err(OrderGatewayError::InsufficientStock {
            product: p.title,
            available: p.stock,
            requested: quantity,
        }),
    }
}

/// Returns reserved stock to the pool. Unconditional by contract; callers guard against double release.
pub async fn release_stock(
    product_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<(), OrderGatewayError> {
    let result =
        sqlx::query("UPDATE products SET stock = stock + $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2")
            .bind(quantity)
            .bind(product_id)
            .execute(conn)
            .await?;
    if result.rows_affected() == 0 {
        return Err(OrderGatewayError::ProductNotFound(product_id));
    }
    trace!("🗃️ Released {quantity} units of product #{product_id}");
    Ok(())
}
