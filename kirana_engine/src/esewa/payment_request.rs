use kirana_common::Money;
use serde::{Deserialize, Serialize};

use super::{signing::esewa_signature, EsewaConfig};
use crate::db_types::OrderReference;

/// The signed form the storefront posts to eSewa to initiate a payment. Field names and the signed-field list are
/// part of the gateway's wire contract and must not change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsewaPaymentRequest {
    pub tax_amount: String,
    pub total_amount: String,
    pub transaction_uuid: String,
    pub product_code: String,
    pub product_service_charge: String,
    pub product_delivery_charge: String,
    pub success_url: String,
    pub failure_url: String,
    pub signed_field_names: String,
    pub signature: String,
}

pub const REQUEST_SIGNED_FIELDS: &str = "total_amount,transaction_uuid,product_code";

impl EsewaPaymentRequest {
    /// Builds the payment request for an order: the order total, the order reference as `transaction_uuid`, the
    /// merchant product code, zero service and delivery charges, and an HMAC over
    /// `total_amount,transaction_uuid,product_code` using the same primitive the verifier checks with.
    pub fn build(total: Money, reference: &OrderReference, config: &EsewaConfig) -> Self {
        let total_amount = total.to_plain_string();
        let message = format!(
            "total_amount={total_amount},transaction_uuid={reference},product_code={}",
            config.product_code
        );
        let signature = esewa_signature(config.secret.reveal(), &message);
        Self {
            tax_amount: "0".to_string(),
            total_amount,
            transaction_uuid: reference.to_string(),
            product_code: config.product_code.clone(),
            product_service_charge: "0".to_string(),
            product_delivery_charge: "0".to_string(),
            success_url: config.success_url_for(reference),
            failure_url: config.failure_url.clone(),
            signed_field_names: REQUEST_SIGNED_FIELDS.to_string(),
            signature,
        }
    }
}
