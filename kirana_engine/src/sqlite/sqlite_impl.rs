//! `SqliteDatabase` is the concrete SQLite implementation of the order gateway storage trait.
//!
//! All multi-row operations run inside a single transaction; stock is only ever touched through the conditional
//! updates in [`products`], so the `stock >= 0` invariant holds under any interleaving of concurrent requests.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;

use super::db::{new_pool, order_items, orders, products, run_migrations};
use crate::{
    db_types::{NewOrder, NewProduct, Order, OrderItem, OrderItemRequest, OrderReference, OrderStatus, PaymentStatus, Product},
    traits::{OrderGatewayDatabase, OrderGatewayError, PaymentOutcome},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connects to the database at `url`, creating it if necessary, and brings the schema up to date.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, OrderGatewayError> {
        let pool = new_pool(url, max_connections).await?;
        run_migrations(&pool).await.map_err(|e| OrderGatewayError::DatabaseError(e.to_string()))?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Seeds a catalog product. Production catalogs are managed by the storefront; this is for fixtures and tests.
    pub async fn insert_product(&self, product: NewProduct) -> Result<Product, OrderGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::insert_product(product, &mut conn).await?;
        Ok(product)
    }
}

impl OrderGatewayDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, OrderGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let product = products::fetch_product(product_id, &mut conn).await?;
        Ok(product)
    }

    async fn reserve_stock(&self, product_id: i64, quantity: i64) -> Result<(), OrderGatewayError> {
        let mut conn = self.pool.acquire().await?;
        products::reserve_stock(product_id, quantity, &mut conn).await
    }

    async fn release_stock(&self, product_id: i64, quantity: i64) -> Result<(), OrderGatewayError> {
        let mut conn = self.pool.acquire().await?;
        products::release_stock(product_id, quantity, &mut conn).await
    }

    async fn insert_full_order(
        &self,
        order: NewOrder,
        items: &[OrderItemRequest],
    ) -> Result<(Order, Vec<OrderItem>), OrderGatewayError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::insert_order(order, &mut tx).await?;
        let mut lines = Vec::with_capacity(items.len());
        for item in items {
            let product = products::fetch_product(item.product_id, &mut tx)
                .await?
                .ok_or(OrderGatewayError::ProductNotFound(item.product_id))?;
            // Reserving before inserting the line means an InsufficientStock error aborts the whole transaction
            // with no partial writes.
            products::reserve_stock(item.product_id, item.quantity, &mut tx).await?;
            let line = order_items::insert_item(order.id, &product, item.quantity, &mut tx).await?;
            lines.push(line);
        }
        tx.commit().await?;
        debug!("🗃️ Order [{}] saved with {} lines for user #{}", order.reference, lines.len(), order.user_id);
        Ok((order, lines))
    }

    async fn fetch_order_by_id(&self, order_id: i64, user_id: i64) -> Result<Option<Order>, OrderGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_for_user(order_id, user_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_by_reference(&self, reference: &OrderReference) -> Result<Option<Order>, OrderGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_reference(reference, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders_for_user(user_id, &mut conn).await?;
        Ok(orders)
    }

    async fn fetch_all_orders(&self, payment_status: Option<PaymentStatus>) -> Result<Vec<Order>, OrderGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_all_orders(payment_status, &mut conn).await?;
        Ok(orders)
    }

    async fn fetch_items_for_order(&self, order_id: i64) -> Result<Vec<OrderItem>, OrderGatewayError> {
        let mut conn = self.pool.acquire().await?;
        let items = order_items::fetch_items_for_order(order_id, &mut conn).await?;
        Ok(items)
    }

    async fn apply_payment(
        &self,
        reference: &OrderReference,
        transaction_code: &str,
    ) -> Result<PaymentOutcome, OrderGatewayError> {
        let mut tx = self.pool.begin().await?;
        // The conditional update is the idempotence guard: it only matches a pending order, so replays and racing
        // callbacks fall through to the status inspection below.
        if let Some(order) = orders::mark_paid(reference, transaction_code, &mut tx).await? {
            tx.commit().await?;
            debug!("🗃️ Payment applied to order [{reference}], transaction code {transaction_code}");
            return Ok(PaymentOutcome::Applied(order));
        }
        let order = orders::fetch_order_by_reference(reference, &mut tx)
            .await?
            .ok_or(OrderGatewayError::OrderNotFound)?;
        tx.commit().await?;
        match order.payment_status {
            PaymentStatus::Done => {
                debug!("🗃️ Order [{reference}] was already marked paid. Nothing to do");
                Ok(PaymentOutcome::AlreadyDone(order))
            },
            // Only pending passes this guard, and pending rows are claimed by the conditional update above.
            status if status.can_transition_to(PaymentStatus::Done) => Err(OrderGatewayError::DatabaseError(
                format!("Order [{reference}] was {status} but the payment update did not apply"),
            )),
            status => Err(OrderGatewayError::InvalidPaymentTransition(format!(
                "Order [{reference}] cannot move from {status} to done"
            ))),
        }
    }

    async fn cancel_order(&self, order_id: i64, user_id: i64) -> Result<Order, OrderGatewayError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::fetch_order_for_user(order_id, user_id, &mut tx)
            .await?
            .ok_or(OrderGatewayError::OrderNotFound)?;
        if !order.order_status.can_cancel() {
            return Err(OrderGatewayError::InvalidTransition(
                "Order cannot be cancelled after shipping".to_string(),
            ));
        }
        // The status guard above makes this release single-shot: a second cancel attempt never reaches this point.
        let items = order_items::fetch_items_for_order(order_id, &mut tx).await?;
        for item in &items {
            products::release_stock(item.product_id, item.quantity, &mut tx).await?;
        }
        let order = orders::update_order_status(order_id, OrderStatus::Cancelled, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order [{}] cancelled; stock restored for {} lines", order.reference, items.len());
        Ok(order)
    }

    async fn delete_order(&self, order_id: i64, user_id: i64) -> Result<(), OrderGatewayError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::fetch_order_for_user(order_id, user_id, &mut tx)
            .await?
            .ok_or(OrderGatewayError::OrderNotFound)?;
        if !order.order_status.can_delete() {
            return Err(OrderGatewayError::InvalidTransition("Only cancelled orders can be deleted".to_string()));
        }
        order_items::delete_items_for_order(order_id, &mut tx).await?;
        orders::delete_order(order_id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order [{}] deleted", order.reference);
        Ok(())
    }

    async fn advance_order_status(&self, order_id: i64, new_status: OrderStatus) -> Result<Order, OrderGatewayError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::fetch_order(order_id, &mut tx).await?.ok_or(OrderGatewayError::OrderNotFound)?;
        if !order.order_status.can_advance_to(new_status) {
            return Err(OrderGatewayError::InvalidTransition(format!(
                "Order status cannot change from {} to {new_status}",
                order.order_status
            )));
        }
        let order = orders::update_order_status(order_id, new_status, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order [{}] advanced to {new_status}", order.reference);
        Ok(order)
    }

    async fn close(&mut self) -> Result<(), OrderGatewayError> {
        self.pool.close().await;
        Ok(())
    }
}
