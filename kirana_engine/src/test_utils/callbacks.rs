use std::collections::HashMap;

use crate::{
    db_types::OrderReference,
    esewa::{
        signing::{esewa_signature, signed_message},
        EsewaCallback, DEFAULT_ESEWA_PRODUCT_CODE, SUCCESS_STATUS,
    },
};

const CALLBACK_SIGNED_FIELDS: &str =
    "transaction_code,status,total_amount,transaction_uuid,product_code,signed_field_names";

/// Builds a correctly signed callback for the given order, exactly as the gateway would produce it.
pub fn signed_callback(
    reference: &OrderReference,
    total_amount: &str,
    transaction_code: &str,
    secret: &str,
) -> EsewaCallback {
    callback_with_status(reference, total_amount, transaction_code, SUCCESS_STATUS, secret)
}

pub fn callback_with_status(
    reference: &OrderReference,
    total_amount: &str,
    transaction_code: &str,
    status: &str,
    secret: &str,
) -> EsewaCallback {
    let mut cb = EsewaCallback {
        status: status.to_string(),
        transaction_uuid: reference.to_string(),
        total_amount: total_amount.to_string(),
        transaction_code: transaction_code.to_string(),
        signed_field_names: CALLBACK_SIGNED_FIELDS.to_string(),
        signature: String::new(),
        extra: HashMap::from([("product_code".to_string(), DEFAULT_ESEWA_PRODUCT_CODE.to_string())]),
    };
    let message = signed_message(&cb.signed_field_names, |name| cb.field(name)).expect("all signed fields present");
    cb.signature = esewa_signature(secret, &message);
    cb
}

/// Base64-encodes a callback the way it arrives on the wire.
pub fn encode_callback(cb: &EsewaCallback) -> String {
    base64::encode(serde_json::to_vec(cb).expect("callback serialises"))
}
