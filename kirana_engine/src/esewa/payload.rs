use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{
    errors::EsewaVerificationError,
    signing::{esewa_signature, signed_message},
};

/// The decoded callback payload eSewa posts back after a payment attempt.
///
/// The gateway decides which of the payload's own fields were signed and declares them, in order, in
/// `signed_field_names`. Fields outside the fixed set land in `extra` so that signature reconstruction can resolve
/// any declared name ([`EsewaCallback::field`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsewaCallback {
    pub status: String,
    pub transaction_uuid: String,
    pub total_amount: String,
    #[serde(default)]
    pub transaction_code: String,
    pub signed_field_names: String,
    pub signature: String,
    #[serde(flatten)]
    pub extra: HashMap<String, String>,
}

impl EsewaCallback {
    /// Decodes a base64(JSON) callback payload. Anything that is not valid base64-encoded JSON is rejected as
    /// malformed; the detail is kept for logging but not surfaced to callers.
    pub fn decode(encoded: &str) -> Result<Self, EsewaVerificationError> {
        let raw = base64::decode(encoded.trim()).map_err(|e| EsewaVerificationError::MalformedPayload(e.to_string()))?;
        serde_json::from_slice(&raw).map_err(|e| EsewaVerificationError::MalformedPayload(e.to_string()))
    }

    /// Looks a field up by the name it carries in `signed_field_names`.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "status" => Some(self.status.as_str()),
            "transaction_uuid" => Some(self.transaction_uuid.as_str()),
            "total_amount" => Some(self.total_amount.as_str()),
            "transaction_code" => Some(self.transaction_code.as_str()),
            "signed_field_names" => Some(self.signed_field_names.as_str()),
            other => self.extra.get(other).map(String::as_str),
        }
    }

    /// Recomputes the HMAC over the declared signed fields and requires exact equality with the asserted signature.
    pub fn verify_signature(&self, secret: &str) -> Result<(), EsewaVerificationError> {
        let message = signed_message(&self.signed_field_names, |name| self.field(name))?;
        let expected = esewa_signature(secret, &message);
        if expected == self.signature {
            Ok(())
        } else {
            Err(EsewaVerificationError::SignatureMismatch)
        }
    }
}
