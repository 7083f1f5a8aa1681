//! JWT access token issuing, verification and extraction.
//!
//! Tokens are HS256-signed with the key from [`AuthConfig`] and carried in the `Authorization: Bearer` header.
//! Handlers receive the verified claims by taking a [`JwtClaims`] parameter; the [`actix_web::FromRequest`] impl
//! rejects the request before the handler runs if the token is absent, expired or forged.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{config::AuthConfig, errors::AuthError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The authenticated user's id.
    pub sub: i64,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl JwtClaims {
    pub fn require_admin(&self) -> Result<(), AuthError> {
        match self.role {
            Role::Admin => Ok(()),
            Role::User => Err(AuthError::InsufficientPermissions("This endpoint requires the admin role.".to_string())),
        }
    }
}

impl FromRequest for JwtClaims {
    type Error = crate::errors::ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(claims_from_request(req).map_err(crate::errors::ServerError::from))
    }
}

fn claims_from_request(req: &HttpRequest) -> Result<JwtClaims, AuthError> {
    let header = req.headers().get(AUTHORIZATION).ok_or(AuthError::MissingToken)?;
    let token = header
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AuthError::PoorlyFormattedToken("Expected a Bearer token.".to_string()))?;
    let verifier = req
        .app_data::<web::Data<TokenVerifier>>()
        .ok_or_else(|| AuthError::ValidationError("No verification key has been configured.".to_string()))?;
    verifier.verify(token)
}

pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        Self { decoding_key, validation }
    }

    pub fn verify(&self, token: &str) -> Result<JwtClaims, AuthError> {
        decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map(|data| data.claims).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::ValidationError(e.to_string()),
            },
        )
    }
}

pub struct TokenIssuer {
    encoding_key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        Self { encoding_key: EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes()) }
    }

    /// Issues a signed access token for the given user. Tokens are valid for 24 hours unless a duration is given;
    /// they do not refresh.
    pub fn issue_token(&self, user_id: i64, role: Role, duration: Option<Duration>) -> Result<String, AuthError> {
        let now = Utc::now();
        let duration = duration.unwrap_or_else(|| Duration::hours(24));
        let claims = JwtClaims { sub: user_id, role, iat: now.timestamp(), exp: (now + duration).timestamp() };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::ValidationError(e.to_string()))
    }
}
