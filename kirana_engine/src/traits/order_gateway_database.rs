use thiserror::Error;

use crate::db_types::{NewOrder, Order, OrderItem, OrderItemRequest, OrderReference, OrderStatus, PaymentStatus, Product};

/// The outcome of applying a payment confirmation to an order.
#[derive(Debug, Clone)]
pub enum PaymentOutcome {
    /// The order moved from `pending` to `done` and the transaction code was recorded.
    Applied(Order),
    /// The order was already `done`. Nothing was mutated; replays land here.
    AlreadyDone(Order),
}

impl PaymentOutcome {
    pub fn order(&self) -> &Order {
        match self {
            PaymentOutcome::Applied(o) | PaymentOutcome::AlreadyDone(o) => o,
        }
    }
}

/// This trait defines the storage behaviour backing the order lifecycle and payment reconciliation flows.
///
/// The multi-row operations (`insert_full_order`, `apply_payment`, `cancel_order`, `delete_order`) must each be
/// atomic: they either fully commit or leave no trace. Stock mutations must be conditional updates executed by the
/// storage engine itself, never read-then-write round trips, so that concurrent orders cannot oversell.
#[allow(async_fn_in_trait)]
pub trait OrderGatewayDatabase: Clone {
    /// The URL of the database.
    fn url(&self) -> &str;

    async fn fetch_product(&self, product_id: i64) -> Result<Option<Product>, OrderGatewayError>;

    /// Decrements stock for the product if and only if at least `quantity` units are available.
    async fn reserve_stock(&self, product_id: i64, quantity: i64) -> Result<(), OrderGatewayError>;

    /// Returns previously reserved stock to the available pool. Unconditional; guarding against double release is
    /// the caller's responsibility (the cancellation flow does this via the status transition).
    async fn release_stock(&self, product_id: i64, quantity: i64) -> Result<(), OrderGatewayError>;

    /// Persists an order together with all its lines in a single transaction: insert the order, snapshot each
    /// product's price, name and description into its line, and reserve stock per line. If any line cannot be
    /// reserved, the whole transaction rolls back and the error identifies the offending product.
    async fn insert_full_order(
        &self,
        order: NewOrder,
        items: &[OrderItemRequest],
    ) -> Result<(Order, Vec<OrderItem>), OrderGatewayError>;

    /// Fetches an order scoped to its owner. Returns `None` when the order is absent or owned by someone else.
    async fn fetch_order_by_id(&self, order_id: i64, user_id: i64) -> Result<Option<Order>, OrderGatewayError>;

    async fn fetch_order_by_reference(&self, reference: &OrderReference) -> Result<Option<Order>, OrderGatewayError>;

    /// All orders for a user, newest first.
    async fn fetch_orders_for_user(&self, user_id: i64) -> Result<Vec<Order>, OrderGatewayError>;

    /// Every order in the system, newest first, optionally narrowed to a payment status. Back-office use only.
    async fn fetch_all_orders(&self, payment_status: Option<PaymentStatus>) -> Result<Vec<Order>, OrderGatewayError>;

    async fn fetch_items_for_order(&self, order_id: i64) -> Result<Vec<OrderItem>, OrderGatewayError>;

    /// Applies a verified payment to the order with the given reference: an atomic check-and-set that moves
    /// `payment_status` from `pending` to `done` and records the gateway's transaction code.
    ///
    /// Two callbacks racing on the same order cannot both observe `pending`; exactly one applies and the other is
    /// reported as [`PaymentOutcome::AlreadyDone`]. Any other starting status is an illegal transition.
    async fn apply_payment(
        &self,
        reference: &OrderReference,
        transaction_code: &str,
    ) -> Result<PaymentOutcome, OrderGatewayError>;

    /// Cancels an order on behalf of its owner: rejects shipped/delivered orders, releases the stock of every line
    /// exactly once and marks the order cancelled, all in one transaction.
    async fn cancel_order(&self, order_id: i64, user_id: i64) -> Result<Order, OrderGatewayError>;

    /// Removes a cancelled order and its lines. Orders in any other state are refused.
    async fn delete_order(&self, order_id: i64, user_id: i64) -> Result<(), OrderGatewayError>;

    /// Administrative fulfilment update. Only forward moves are allowed; cancellation must go through
    /// [`Self::cancel_order`] so stock is restored.
    async fn advance_order_status(&self, order_id: i64, new_status: OrderStatus) -> Result<Order, OrderGatewayError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), OrderGatewayError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum OrderGatewayError {
    #[error("We have an internal database engine problem: {0}")]
    DatabaseError(String),
    #[error("Product {0} not found")]
    ProductNotFound(i64),
    #[error("Insufficient stock for \"{product}\". Available: {available}, Requested: {requested}")]
    InsufficientStock { product: String, available: i64, requested: i64 },
    #[error("Order not found")]
    OrderNotFound,
    #[error("Cannot insert order, since it already exists with reference {0}")]
    OrderAlreadyExists(OrderReference),
    #[error("Invalid order: {0}")]
    ValidationError(String),
    #[error("{0}")]
    InvalidTransition(String),
    #[error("Illegal payment status change. {0}")]
    InvalidPaymentTransition(String),
}

impl From<sqlx::Error> for OrderGatewayError {
    fn from(e: sqlx::Error) -> Self {
        OrderGatewayError::DatabaseError(e.to_string())
    }
}
