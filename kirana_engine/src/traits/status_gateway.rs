use thiserror::Error;

/// What the gateway's status API says about a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayStatus {
    Complete,
    /// The gateway answered, but with some other status (PENDING, CANCELED, NOT_FOUND, ...).
    Other(String),
}

#[derive(Debug, Clone, Error)]
pub enum StatusGatewayError {
    /// The status API could not be reached at all. The verifier treats this as a degraded-trust situation and
    /// accepts the HMAC check alone.
    #[error("eSewa status API unreachable: {0}")]
    Unreachable(String),
    #[error("eSewa status API returned an unusable response: {0}")]
    BadResponse(String),
}

/// Cross-verification against the payment gateway's own record of a transaction, independent of the locally
/// validated signature.
#[allow(async_fn_in_trait)]
pub trait EsewaStatusGateway: Clone {
    async fn transaction_status(
        &self,
        transaction_uuid: &str,
        total_amount: &str,
    ) -> Result<GatewayStatus, StatusGatewayError>;
}
