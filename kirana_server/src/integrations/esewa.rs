//! HTTP client for eSewa's transaction status API.
//!
//! The engine only knows the [`EsewaStatusGateway`] trait; this is the production implementation. Transport
//! failures map to [`StatusGatewayError::Unreachable`] so the verifier can fall back to HMAC-only verification,
//! while answers we cannot interpret map to [`StatusGatewayError::BadResponse`] and block the payment.

use std::time::Duration;

use kirana_engine::{
    esewa::{EsewaConfig, SUCCESS_STATUS},
    traits::{EsewaStatusGateway, GatewayStatus, StatusGatewayError},
};
use log::*;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::ServerError;

const STATUS_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct EsewaStatusClient {
    client: Client,
    status_url: String,
    product_code: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    status: String,
}

impl EsewaStatusClient {
    pub fn new(config: &EsewaConfig) -> Result<Self, ServerError> {
        let client = Client::builder()
            .timeout(STATUS_TIMEOUT)
            .build()
            .map_err(|e| ServerError::InitializeError(e.to_string()))?;
        Ok(Self { client, status_url: config.status_url.clone(), product_code: config.product_code.clone() })
    }
}

impl EsewaStatusGateway for EsewaStatusClient {
    async fn transaction_status(
        &self,
        transaction_uuid: &str,
        total_amount: &str,
    ) -> Result<GatewayStatus, StatusGatewayError> {
        trace!("💸️ Checking eSewa status for transaction [{transaction_uuid}]");
        let response = self
            .client
            .get(&self.status_url)
            .query(&[
                ("product_code", self.product_code.as_str()),
                ("total_amount", total_amount),
                ("transaction_uuid", transaction_uuid),
            ])
            .send()
            .await
            .map_err(|e| StatusGatewayError::Unreachable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(StatusGatewayError::BadResponse(format!("status API answered {}", response.status())));
        }
        let body =
            response.json::<StatusResponse>().await.map_err(|e| StatusGatewayError::BadResponse(e.to_string()))?;
        debug!("💸️ eSewa reports transaction [{transaction_uuid}] as {}", body.status);
        if body.status == SUCCESS_STATUS {
            Ok(GatewayStatus::Complete)
        } else {
            Ok(GatewayStatus::Other(body.status))
        }
    }
}
