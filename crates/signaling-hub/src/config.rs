//! Signaling hub configuration.
//!
//! Configuration is loaded from environment variables. All sensitive
//! fields are redacted in Debug output.

use common::secret::SecretString;
use std::collections::HashMap;
use std::env;
use std::fmt;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:1926";

/// Signaling hub configuration.
///
/// Loaded from environment variables with sensible defaults.
/// Sensitive fields are redacted in Debug output.
#[derive(Clone)]
pub struct Config {
    /// Secret used to sign bearer tokens and anonymous room tokens.
    /// Protected by `SecretString` to prevent accidental logging.
    pub session_secret: SecretString,

    /// SFU API key (carried as the issuer claim in media grants).
    pub livekit_api_key: String,

    /// SFU API secret used to sign media grants.
    /// Protected by `SecretString` to prevent accidental logging.
    pub livekit_api_secret: SecretString,

    /// SFU server URL handed to clients.
    pub livekit_server_url: String,

    /// PostgreSQL connection URL (read-only user/team store).
    /// Protected by `SecretString`; the URL may embed credentials.
    pub database_url: SecretString,

    /// Redis connection URL (presence and message fabric).
    /// Protected by `SecretString`; the URL may embed credentials.
    pub redis_url: SecretString,

    /// HTTP bind address (default: "0.0.0.0:1926").
    pub bind_address: String,

    /// Public domain the hub is deployed under (default: the bind address).
    pub deploy_domain: String,

    /// Whether the debug token endpoints are mounted.
    pub debug: bool,
}

/// Custom Debug implementation that redacts sensitive fields.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("session_secret", &"[REDACTED]")
            .field("livekit_api_key", &self.livekit_api_key)
            .field("livekit_api_secret", &"[REDACTED]")
            .field("livekit_server_url", &self.livekit_server_url)
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &"[REDACTED]")
            .field("bind_address", &self.bind_address)
            .field("deploy_domain", &self.deploy_domain)
            .field("debug", &self.debug)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when a required variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when a required variable is unset.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let require = |name: &str| -> Result<String, ConfigError> {
            vars.get(name)
                .cloned()
                .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };

        let session_secret = SecretString::from(require("SESSION_SECRET")?);
        let livekit_api_key = require("LIVEKIT_API_KEY")?;
        let livekit_api_secret = SecretString::from(require("LIVEKIT_API_SECRET")?);
        let livekit_server_url = require("LIVEKIT_SERVER_URL")?;
        let database_url = SecretString::from(require("DATABASE_URL")?);
        let redis_url = SecretString::from(require("REDIS_URL")?);

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let deploy_domain = vars
            .get("DEPLOY_DOMAIN")
            .cloned()
            .unwrap_or_else(|| bind_address.clone());

        let debug = vars
            .get("ENABLE_DEBUG_ENDPOINTS")
            .is_some_and(|v| v == "true");

        Ok(Config {
            session_secret,
            livekit_api_key,
            livekit_api_secret,
            livekit_server_url,
            database_url,
            redis_url,
            bind_address,
            deploy_domain,
            debug,
        })
    }
}
