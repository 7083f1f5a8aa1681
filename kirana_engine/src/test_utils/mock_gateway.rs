use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use crate::traits::{EsewaStatusGateway, GatewayStatus, StatusGatewayError};

/// What the mock status API should answer with.
#[derive(Debug, Clone)]
pub enum MockGatewayResponse {
    Complete,
    Other(String),
    Unreachable,
    BadResponse,
}

/// An in-memory stand-in for eSewa's transaction status API with a scriptable response and a call counter.
#[derive(Debug, Clone)]
pub struct MockStatusGateway {
    response: Arc<Mutex<MockGatewayResponse>>,
    calls: Arc<AtomicUsize>,
}

impl MockStatusGateway {
    pub fn with_response(response: MockGatewayResponse) -> Self {
        Self { response: Arc::new(Mutex::new(response)), calls: Arc::new(AtomicUsize::new(0)) }
    }

    /// A gateway that confirms every transaction.
    pub fn confirming() -> Self {
        Self::with_response(MockGatewayResponse::Complete)
    }

    pub fn set_response(&self, response: MockGatewayResponse) {
        *self.response.lock().unwrap() = response;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EsewaStatusGateway for MockStatusGateway {
    async fn transaction_status(
        &self,
        _transaction_uuid: &str,
        _total_amount: &str,
    ) -> Result<GatewayStatus, StatusGatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let response = self.response.lock().unwrap().clone();
        match response {
            MockGatewayResponse::Complete => Ok(GatewayStatus::Complete),
            MockGatewayResponse::Other(status) => Ok(GatewayStatus::Other(status)),
            MockGatewayResponse::Unreachable => {
                Err(StatusGatewayError::Unreachable("mock status API is offline".to_string()))
            },
            MockGatewayResponse::BadResponse => {
                Err(StatusGatewayError::BadResponse("mock status API returned gibberish".to_string()))
            },
        }
    }
}
