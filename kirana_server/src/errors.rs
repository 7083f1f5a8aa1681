use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use kirana_engine::{esewa::EsewaVerificationError, traits::OrderGatewayError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("{0}")]
    OrderError(OrderGatewayError),
    /// The callback failed to decode or its signature did not check out. The detail stays in the logs; clients only
    /// see the generic message.
    #[error("Payment could not be verified")]
    PaymentVerificationFailed,
    #[error("Payment is not complete. {0}")]
    PaymentNotComplete(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AuthenticationError(e) => match e {
                AuthError::MissingToken => StatusCode::UNAUTHORIZED,
                AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
                AuthError::ValidationError(_) => StatusCode::UNAUTHORIZED,
                AuthError::PoorlyFormattedToken(_) => StatusCode::BAD_REQUEST,
                AuthError::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            },
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::OrderError(e) => match e {
                OrderGatewayError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
                OrderGatewayError::OrderNotFound => StatusCode::NOT_FOUND,
                OrderGatewayError::ProductNotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::PaymentVerificationFailed => StatusCode::BAD_REQUEST,
            Self::PaymentNotComplete(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<OrderGatewayError> for ServerError {
    fn from(e: OrderGatewayError) -> Self {
        Self::OrderError(e)
    }
}

impl From<EsewaVerificationError> for ServerError {
    fn from(e: EsewaVerificationError) -> Self {
        match e {
            EsewaVerificationError::MalformedPayload(_) |
            EsewaVerificationError::SignatureMismatch |
            EsewaVerificationError::MissingSignedField(_) => Self::PaymentVerificationFailed,
            EsewaVerificationError::PaymentNotComplete(s) => Self::PaymentNotComplete(s),
            EsewaVerificationError::GatewayNotConfirmed => {
                Self::PaymentNotComplete("The payment gateway did not confirm the transaction".to_string())
            },
            EsewaVerificationError::OrderNotFound(reference) => {
                Self::NoRecordFound(format!("No order with reference {reference}"))
            },
            EsewaVerificationError::InvalidTransition(s) => Self::InvalidRequestBody(s),
            EsewaVerificationError::DatabaseError(s) => Self::BackendError(s),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("No access token was provided.")]
    MissingToken,
    #[error("Access token has expired.")]
    TokenExpired,
    #[error("Access token signature is invalid. {0}")]
    ValidationError(String),
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
}
