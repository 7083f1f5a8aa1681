//! eSewa payment verification and signing.
//!
//! eSewa is an HMAC-based payment gateway. When a buyer completes payment, the gateway redirects them to our
//! success URL with a base64-encoded JSON payload asserting the outcome. Nothing about that payload can be trusted
//! until it has been verified:
//!
//! 1. The payload must decode ([`EsewaCallback::decode`]).
//! 2. The payload's own HMAC-SHA256 signature over its declared `signed_field_names` must check out
//!    ([`EsewaCallback::verify_signature`]).
//! 3. The payload's status must be the literal success marker ([`SUCCESS_STATUS`]).
//! 4. The transaction is cross-verified against eSewa's status API (a [`crate::traits::EsewaStatusGateway`]
//!    implementation). If the API is unreachable, the HMAC check alone is accepted. This is a deliberate policy
//!    choice for UAT environments, logged loudly when it happens.
//!
//! The same signing primitive ([`signing::esewa_signature`]) is used to sign outgoing payment requests
//! ([`EsewaPaymentRequest`]), so signing and verification are symmetric by construction.

mod errors;
mod payload;
mod payment_request;
pub mod signing;

use kirana_common::Secret;

pub use errors::EsewaVerificationError;
pub use payload::EsewaCallback;
pub use payment_request::EsewaPaymentRequest;
pub use signing::SUCCESS_STATUS;

pub const DEFAULT_ESEWA_SECRET: &str = "8gBm/:&EnhH.1/q";
pub const DEFAULT_ESEWA_PRODUCT_CODE: &str = "EPAYTEST";
pub const DEFAULT_ESEWA_STATUS_URL: &str = "https://rc-epay.esewa.com.np/api/epay/transaction/status/";
pub const DEFAULT_ESEWA_FAILURE_URL: &str = "https://developer.esewa.com.np/failure";
pub const DEFAULT_CLIENT_URL: &str = "https://localhost:3000";

/// Everything the engine needs to talk to eSewa. The shared HMAC secret is injected here and nowhere else; both the
/// signing path (payment requests) and the verification path (callbacks) read it from this struct.
#[derive(Clone, Debug)]
pub struct EsewaConfig {
    pub secret: Secret<String>,
    pub product_code: String,
    /// The gateway's transaction status endpoint, used for cross-verification.
    pub status_url: String,
    /// Base URL of the storefront client. The per-order success URL is derived from it.
    pub client_url: String,
    pub failure_url: String,
}

impl Default for EsewaConfig {
    /// The eSewa UAT (sandbox) credentials. Production deployments must override every field.
    fn default() -> Self {
        Self {
            secret: Secret::new(DEFAULT_ESEWA_SECRET.to_string()),
            product_code: DEFAULT_ESEWA_PRODUCT_CODE.to_string(),
            status_url: DEFAULT_ESEWA_STATUS_URL.to_string(),
            client_url: DEFAULT_CLIENT_URL.to_string(),
            failure_url: DEFAULT_ESEWA_FAILURE_URL.to_string(),
        }
    }
}

impl EsewaConfig {
    pub fn success_url_for(&self, reference: &crate::db_types::OrderReference) -> String {
        format!("{}/order/{}/success", self.client_url, reference)
    }
}
