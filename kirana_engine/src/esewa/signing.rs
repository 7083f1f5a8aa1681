//! The shared HMAC primitive for eSewa messages.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::errors::EsewaVerificationError;

type HmacSha256 = Hmac<Sha256>;

/// The literal status value eSewa uses for a settled transaction.
pub const SUCCESS_STATUS: &str = "COMPLETE";

/// Computes the base64-encoded HMAC-SHA256 digest of `message` under `secret`. This single primitive backs both
/// payment-request signing and callback verification.
pub fn esewa_signature(secret: &str, message: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(message.as_bytes());
    base64::encode(mac.finalize().into_bytes())
}

/// Reconstructs the message that was signed: `field1=value1,field2=value2,...` in the order declared by
/// `signed_field_names` (comma-separated). Field values are resolved through `lookup`; a declared field that cannot
/// be resolved fails closed.
pub fn signed_message<'a, F>(signed_field_names: &str, lookup: F) -> Result<String, EsewaVerificationError>
where F: Fn(&str) -> Option<&'a str> {
    let mut parts = Vec::new();
    for name in signed_field_names.split(',') {
        let name = name.trim();
        let value = lookup(name).ok_or_else(|| EsewaVerificationError::MissingSignedField(name.to_string()))?;
        parts.push(format!("{name}={value}"));
    }
    Ok(parts.join(","))
}
