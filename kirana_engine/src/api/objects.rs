use kirana_common::Money;
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Order, OrderItem, OrderItemRequest, PaymentMode},
    esewa::EsewaPaymentRequest,
};

/// What a buyer submits to place an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub buyer_name: String,
    pub address: String,
    #[serde(default)]
    pub notes: String,
    pub payment_mode: PaymentMode,
}

/// The result of a successful order creation. `esewa` is only present for orders paying through eSewa; the client
/// posts it to the gateway to start the payment.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub esewa: Option<EsewaPaymentRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// The outcome of a successful payment verification.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentVerification {
    pub order: Order,
    /// True when this callback was a replay of an already-applied confirmation and nothing was mutated.
    pub already_verified: bool,
}
