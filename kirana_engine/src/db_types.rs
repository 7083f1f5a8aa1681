use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use kirana_common::Money;
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid status value: {0}")]
pub struct ConversionError(String);

//--------------------------------------   PaymentStatus   -----------------------------------------------------------
/// The payment side of an order's lifecycle. The only sanctioned transitions are
/// `pending → done`, `pending → failed` and `done → refund`. A repeated `done` is treated as an idempotent no-op by
/// the reconciliation flow rather than a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// No confirmation has been received from the payment gateway yet.
    Pending,
    /// The payment has been verified and applied to the order.
    Done,
    /// The gateway reported a failure for this payment.
    Failed,
    /// A completed payment that has subsequently been refunded.
    Refund,
}

impl PaymentStatus {
    pub fn can_transition_to(self, new: PaymentStatus) -> bool {
        use PaymentStatus::*;
        matches!((self, new), (Pending, Done) | (Pending, Failed) | (Done, Refund))
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Done => write!(f, "done"),
            PaymentStatus::Failed => write!(f, "failed"),
            PaymentStatus::Refund => write!(f, "refund"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "done" => Ok(Self::Done),
            "failed" => Ok(Self::Failed),
            "refund" => Ok(Self::Refund),
            s => Err(ConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid payment status: {value}. But this conversion cannot fail. Defaulting to pending");
            PaymentStatus::Pending
        })
    }
}

//--------------------------------------    PaymentMode    -----------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    /// Cash on delivery. No external confirmation is expected.
    Cash,
    /// The eSewa wallet. Orders in this mode receive a signed payment request at creation.
    Esewa,
    /// The Khalti wallet. Accepted at order creation; confirmation is handled out of band.
    Khalti,
}

impl Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMode::Cash => write!(f, "cash"),
            PaymentMode::Esewa => write!(f, "esewa"),
            PaymentMode::Khalti => write!(f, "khalti"),
        }
    }
}

impl FromStr for PaymentMode {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "esewa" => Ok(Self::Esewa),
            "khalti" => Ok(Self::Khalti),
            s => Err(ConversionError(format!("Invalid payment mode: {s}"))),
        }
    }
}

//--------------------------------------    OrderStatus    -----------------------------------------------------------
/// Fulfilment state of an order as a whole. Fulfilment only moves forward
/// (`pending → processing → shipped → delivered`); cancellation is only reachable from `pending` or `processing`
/// and is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    fn rank(self) -> u8 {
        match self {
            OrderStatus::Pending => 0,
            OrderStatus::Processing => 1,
            OrderStatus::Shipped => 2,
            OrderStatus::Delivered => 3,
            OrderStatus::Cancelled => 4,
        }
    }

    /// An order can be cancelled until it leaves the warehouse.
    pub fn can_cancel(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Processing)
    }

    /// Only cancelled orders may be removed from the system.
    pub fn can_delete(self) -> bool {
        matches!(self, OrderStatus::Cancelled)
    }

    /// Whether an administrative status update from `self` to `new` is a legal forward move.
    /// Cancellation is excluded here; it goes through the cancellation flow so that stock is restored.
    pub fn can_advance_to(self, new: OrderStatus) -> bool {
        if matches!(self, OrderStatus::Cancelled) || matches!(new, OrderStatus::Cancelled) {
            return false;
        }
        new.rank() > self.rank()
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Processing => write!(f, "processing"),
            OrderStatus::Shipped => write!(f, "shipped"),
            OrderStatus::Delivered => write!(f, "delivered"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to pending");
            OrderStatus::Pending
        })
    }
}

//--------------------------------------     ItemStatus    -----------------------------------------------------------
/// Line-level fulfilment state. Sellers move their own lines through this lifecycle independently of the order's
/// overall [`OrderStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Accepted,
    Processing,
    Shipping,
    Completed,
    Rejected,
    Cancelled,
}

impl Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Accepted => "accepted",
            ItemStatus::Processing => "processing",
            ItemStatus::Shipping => "shipping",
            ItemStatus::Completed => "completed",
            ItemStatus::Rejected => "rejected",
            ItemStatus::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

//--------------------------------------   OrderReference  -----------------------------------------------------------
/// The externally visible, globally unique identifier of an order. It is generated exactly once at creation, never
/// changes, and doubles as the payment gateway's `transaction_uuid`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderReference(pub String);

impl FromStr for OrderReference {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderReference {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OrderReference {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------       Product     -----------------------------------------------------------
/// A catalog product, as seen by the order engine. The catalog itself is managed elsewhere; the engine only reads
/// the snapshot fields and mutates `stock` through the inventory ledger operations.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    pub short_description: String,
    pub price: Money,
    pub stock: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub short_description: String,
    pub price: Money,
    pub stock: i64,
}

//--------------------------------------        Order      -----------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub reference: OrderReference,
    pub payment_status: PaymentStatus,
    pub payment_mode: PaymentMode,
    pub transaction_code: Option<String>,
    pub order_status: OrderStatus,
    pub buyer_name: String,
    pub address: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------      NewOrder     -----------------------------------------------------------
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    /// The unique reference assigned at creation. Set once, immutable thereafter.
    pub reference: OrderReference,
    pub payment_mode: PaymentMode,
    pub buyer_name: String,
    pub address: String,
    pub notes: String,
}

//--------------------------------------     OrderItem     -----------------------------------------------------------
/// A single line of an order. Price, name and description are snapshots taken at order time and are never re-read
/// from the live catalog.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub price: Money,
    pub product_name: String,
    pub product_description: String,
    pub quantity: i64,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a buyer asks for: a product and a quantity. Everything else on the line is snapshotted by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: i64,
    pub quantity: i64,
}
