use thiserror::Error;

use crate::{db_types::OrderReference, traits::OrderGatewayError};

/// Every way the payment verification pipeline can refuse a callback. Each step of the pipeline short-circuits with
/// its own variant so the caller can report a distinct reason.
#[derive(Debug, Clone, Error)]
pub enum EsewaVerificationError {
    #[error("Invalid payment data encoding")]
    MalformedPayload(String),
    #[error("Signature mismatch. Payment data has been tampered with")]
    SignatureMismatch,
    /// The signed field list names a field the payload does not carry. Verification fails closed.
    #[error("Signed field '{0}' is absent from the payload")]
    MissingSignedField(String),
    #[error("Payment status is {0}")]
    PaymentNotComplete(String),
    #[error("eSewa API could not confirm payment")]
    GatewayNotConfirmed,
    #[error("Order not found for this transaction")]
    OrderNotFound(OrderReference),
    #[error("Illegal payment status change. {0}")]
    InvalidTransition(String),
    #[error("We have an internal database engine problem: {0}")]
    DatabaseError(String),
}

impl From<OrderGatewayError> for EsewaVerificationError {
    fn from(e: OrderGatewayError) -> Self {
        match e {
            OrderGatewayError::InvalidPaymentTransition(s) => Self::InvalidTransition(s),
            OrderGatewayError::DatabaseError(s) => Self::DatabaseError(s),
            other => Self::DatabaseError(other.to_string()),
        }
    }
}
