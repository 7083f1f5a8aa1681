use std::env;

use kirana_common::Secret;
use kirana_engine::esewa::EsewaConfig;
use log::*;
use rand::{distributions::Alphanumeric, thread_rng, Rng};

use crate::errors::ServerError;

const DEFAULT_KPS_HOST: &str = "127.0.0.1";
const DEFAULT_KPS_PORT: u16 = 8000;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// Gateway credentials and URLs shared with the order engine.
    pub esewa: EsewaConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_KPS_HOST.to_string(),
            port: DEFAULT_KPS_PORT,
            database_url: String::default(),
            auth: AuthConfig::default(),
            esewa: EsewaConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("KPS_HOST").ok().unwrap_or_else(|| DEFAULT_KPS_HOST.into());
        let port = env::var("KPS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for KPS_PORT. {e} Using the default, {DEFAULT_KPS_PORT}, instead."
                    );
                    DEFAULT_KPS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_KPS_PORT);
        let database_url = env::var("KPS_DATABASE_URL").ok().unwrap_or_else(|| {
            error!("🪛️ KPS_DATABASE_URL is not set. Please set it to the URL for the Kirana database.");
            String::default()
        });
        let auth = AuthConfig::try_from_env().unwrap_or_else(|e| {
            warn!(
                "🪛️ Could not load the authentication configuration from environment variables. {e}. Reverting to the \
                 default configuration."
            );
            AuthConfig::default()
        });
        let esewa = esewa_config_from_env();
        Self { host, port, database_url, auth, esewa }
    }
}

/// Builds the eSewa configuration from `KPS_ESEWA_*` environment variables, falling back to the UAT sandbox values
/// for anything not set.
pub fn esewa_config_from_env() -> EsewaConfig {
    let mut config = EsewaConfig::default();
    match env::var("KPS_ESEWA_SECRET") {
        Ok(secret) => config.secret = Secret::new(secret),
        Err(_) => warn!(
            "🪛️ KPS_ESEWA_SECRET is not set. Using the eSewa UAT secret. Real payments will not verify with this key."
        ),
    }
    if let Ok(product_code) = env::var("KPS_ESEWA_PRODUCT_CODE") {
        config.product_code = product_code;
    } else {
        info!("🪛️ KPS_ESEWA_PRODUCT_CODE is not set. Using the UAT merchant code, {}.", config.product_code);
    }
    if let Ok(url) = env::var("KPS_ESEWA_STATUS_URL") {
        config.status_url = url;
    }
    if let Ok(url) = env::var("KPS_CLIENT_URL") {
        config.client_url = url;
    } else {
        info!("🪛️ KPS_CLIENT_URL is not set. Payment success redirects will point at {}.", config.client_url);
    }
    if let Ok(url) = env::var("KPS_ESEWA_FAILURE_URL") {
        config.failure_url = url;
    }
    config
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The symmetric key used to sign and verify JWT access tokens.
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT signing key has not been set. I'm using a random value for this session. All issued \
             tokens will be invalidated when the server restarts. Set KPS_JWT_SECRET in production. 🚨️🚨️🚨️"
        );
        let secret: String = thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect();
        Self { jwt_secret: Secret::new(secret) }
    }
}

impl AuthConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        let secret =
            env::var("KPS_JWT_SECRET").map_err(|e| ServerError::ConfigurationError(format!("{e} [KPS_JWT_SECRET]")))?;
        if secret.len() < 32 {
            return Err(ServerError::ConfigurationError(
                "KPS_JWT_SECRET must be at least 32 characters long.".to_string(),
            ));
        }
        Ok(Self { jwt_secret: Secret::new(secret) })
    }
}
