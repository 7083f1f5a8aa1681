use std::fmt::Display;

use kirana_engine::db_types::{OrderStatus, PaymentStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

/// Body of the payment verification endpoint: the base64 payload exactly as eSewa appended it to the redirect URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyEsewaRequest {
    pub data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// Query string for the admin order listing, e.g. `?payment_status=done`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListQuery {
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
}
