use std::fmt::Debug;

use kirana_common::Money;
use log::*;

use crate::{
    api::objects::{CreatedOrder, NewOrderRequest, OrderWithItems, PaymentVerification},
    db_types::{NewOrder, Order, OrderReference, OrderStatus, PaymentMode, PaymentStatus},
    esewa::{EsewaCallback, EsewaConfig, EsewaPaymentRequest, EsewaVerificationError, SUCCESS_STATUS},
    helpers::generate_reference,
    traits::{EsewaStatusGateway, GatewayStatus, OrderGatewayDatabase, OrderGatewayError, PaymentOutcome, StatusGatewayError},
};

/// `OrderFlowApi` is the primary API for the order lifecycle: creation with stock reservation, payment
/// reconciliation from gateway callbacks, cancellation with stock restoration, and the query paths the storefront
/// uses.
pub struct OrderFlowApi<B, G> {
    db: B,
    gateway: G,
    esewa: EsewaConfig,
}

impl<B, G> Debug for OrderFlowApi<B, G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OrderFlowApi")
    }
}

impl<B, G> OrderFlowApi<B, G> {
    pub fn new(db: B, gateway: G, esewa: EsewaConfig) -> Self {
        Self { db, gateway, esewa }
    }
}

impl<B, G> OrderFlowApi<B, G>
where
    B: OrderGatewayDatabase,
    G: EsewaStatusGateway,
{
    /// Places a new order.
    ///
    /// Every line is validated against live stock before anything is written, so a short line fails the request
    /// without side effects. The write itself is a single transaction: order row, line snapshots and stock
    /// reservations all commit together or not at all. Orders paying through eSewa additionally get a signed
    /// payment request built from the committed lines.
    pub async fn create_order(&self, user_id: i64, req: NewOrderRequest) -> Result<CreatedOrder, OrderGatewayError> {
        if req.items.is_empty() {
            return Err(OrderGatewayError::ValidationError("Order must contain at least one item".to_string()));
        }
        for item in &req.items {
            if item.quantity <= 0 {
                return Err(OrderGatewayError::ValidationError(format!(
                    "Quantity for product {} must be positive",
                    item.product_id
                )));
            }
            let product = self
                .db
                .fetch_product(item.product_id)
                .await?
                .ok_or(OrderGatewayError::ProductNotFound(item.product_id))?;
            if product.stock < item.quantity {
                return Err(OrderGatewayError::InsufficientStock {
                    product: product.title,
                    available: product.stock,
                    requested: item.quantity,
                });
            }
        }
        let reference = generate_reference();
        let order = NewOrder {
            user_id,
            reference,
            payment_mode: req.payment_mode,
            buyer_name: req.buyer_name,
            address: req.address,
            notes: req.notes,
        };
        let (order, items) = self.db.insert_full_order(order, &req.items).await?;
        let total: Money = items.iter().map(|i| i.price * i.quantity).sum();
        let esewa = matches!(order.payment_mode, PaymentMode::Esewa)
            .then(|| EsewaPaymentRequest::build(total, &order.reference, &self.esewa));
        info!("🛒️ Order [{}] created for user #{user_id}: {} lines, total {total}", order.reference, items.len());
        Ok(CreatedOrder { order, items, total, esewa })
    }

    /// Runs the full verification pipeline over a base64-encoded gateway callback and, when it passes, applies the
    /// payment to the matching order. Replays of an already-applied confirmation succeed without re-mutating state.
    pub async fn verify_esewa_payment(&self, encoded: &str) -> Result<PaymentVerification, EsewaVerificationError> {
        let payload = EsewaCallback::decode(encoded).map_err(|e| {
            debug!("💸️ Rejected callback that did not decode: {e:?}");
            e
        })?;
        payload.verify_signature(self.esewa.secret.reveal()).map_err(|e| {
            // Security event: a decodable payload with a bad signature is an active tampering attempt or a
            // misconfigured secret. Log loudly, answer vaguely.
            warn!("💸️🚨️ Signature verification failed for callback [{}]: {e}", payload.transaction_uuid);
            e
        })?;
        if payload.status != SUCCESS_STATUS {
            debug!("💸️ Callback [{}] reports status {}", payload.transaction_uuid, payload.status);
            return Err(EsewaVerificationError::PaymentNotComplete(payload.status.clone()));
        }
        match self.gateway.transaction_status(&payload.transaction_uuid, &payload.total_amount).await {
            Ok(GatewayStatus::Complete) => {
                trace!("💸️ eSewa confirmed transaction [{}]", payload.transaction_uuid);
            },
            Ok(GatewayStatus::Other(status)) => {
                debug!("💸️ eSewa reports [{}] as {status}, not COMPLETE", payload.transaction_uuid);
                return Err(EsewaVerificationError::GatewayNotConfirmed);
            },
            Err(StatusGatewayError::Unreachable(e)) => {
                // Deliberate trust relaxation: the HMAC already proved the payload's authenticity, so an
                // unreachable status API downgrades to HMAC-only verification instead of failing the payment.
                warn!("💸️ eSewa status API unreachable. Falling back to HMAC-only verification: {e}");
            },
            Err(StatusGatewayError::BadResponse(e)) => {
                warn!("💸️ eSewa status API gave an unusable response: {e}");
                return Err(EsewaVerificationError::GatewayNotConfirmed);
            },
        }
        let reference = OrderReference::from(payload.transaction_uuid.clone());
        match self.db.apply_payment(&reference, &payload.transaction_code).await {
            Ok(PaymentOutcome::Applied(order)) => {
                info!("💸️ Payment verified for order [{reference}]; transaction code {}", payload.transaction_code);
                Ok(PaymentVerification { order, already_verified: false })
            },
            Ok(PaymentOutcome::AlreadyDone(order)) => {
                debug!("💸️ Duplicate callback for order [{reference}]. Already verified");
                Ok(PaymentVerification { order, already_verified: true })
            },
            Err(OrderGatewayError::OrderNotFound) => Err(EsewaVerificationError::OrderNotFound(reference)),
            Err(e) => Err(e.into()),
        }
    }

    /// Cancels an order on behalf of its owner, restoring the stock of every line.
    pub async fn cancel_order(&self, order_id: i64, user_id: i64) -> Result<Order, OrderGatewayError> {
        let order = self.db.cancel_order(order_id, user_id).await?;
        info!("🛒️ Order [{}] cancelled by user #{user_id}", order.reference);
        Ok(order)
    }

    /// Deletes a cancelled order and its lines.
    pub async fn delete_order(&self, order_id: i64, user_id: i64) -> Result<(), OrderGatewayError> {
        self.db.delete_order(order_id, user_id).await?;
        info!("🛒️ Order #{order_id} deleted by user #{user_id}");
        Ok(())
    }

    /// All orders for a user with their lines, newest first.
    pub async fn my_orders(&self, user_id: i64) -> Result<Vec<OrderWithItems>, OrderGatewayError> {
        let orders = self.db.fetch_orders_for_user(user_id).await?;
        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.db.fetch_items_for_order(order.id).await?;
            result.push(OrderWithItems { order, items });
        }
        Ok(result)
    }

    /// A single order with its lines, scoped to the requesting user.
    pub async fn order_by_id(&self, order_id: i64, user_id: i64) -> Result<OrderWithItems, OrderGatewayError> {
        let order =
            self.db.fetch_order_by_id(order_id, user_id).await?.ok_or(OrderGatewayError::OrderNotFound)?;
        let items = self.db.fetch_items_for_order(order.id).await?;
        Ok(OrderWithItems { order, items })
    }

    /// Looks an order up by its public reference. Used by the post-payment tracking page, so it is not user-scoped.
    pub async fn track_order(&self, reference: &OrderReference) -> Result<OrderWithItems, OrderGatewayError> {
        let order = self.db.fetch_order_by_reference(reference).await?.ok_or(OrderGatewayError::OrderNotFound)?;
        let items = self.db.fetch_items_for_order(order.id).await?;
        Ok(OrderWithItems { order, items })
    }

    /// Administrative listing of every order, newest first, optionally narrowed to a payment status.
    pub async fn all_orders(&self, payment_status: Option<PaymentStatus>) -> Result<Vec<Order>, OrderGatewayError> {
        self.db.fetch_all_orders(payment_status).await
    }

    /// Administrative fulfilment update (forward-only).
    pub async fn advance_order_status(
        &self,
        order_id: i64,
        new_status: OrderStatus,
    ) -> Result<Order, OrderGatewayError> {
        let order = self.db.advance_order_status(order_id, new_status).await?;
        info!("🛒️ Order [{}] moved to {new_status}", order.reference);
        Ok(order)
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
