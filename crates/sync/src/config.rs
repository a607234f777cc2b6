//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `POYNT_BUSINESS_ID` - Poynt business identifier
//! - `POYNT_APPLICATION_ID` - Poynt application identifier
//! - `POYNT_PRIVATE_KEY` - Key used to sign token-grant assertions
//! - `BRIDGE_WEBHOOK_SECRET` - Shared secret for inbound webhook signatures
//!
//! ## Optional
//! - `BRIDGE_HOST` - Bind address (default: 127.0.0.1)
//! - `BRIDGE_PORT` - Listen port (default: 3100)
//! - `POYNT_API_URL` - Poynt service base URL (default: <https://services.poynt.net>)
//! - `BRIDGE_DELIVERY_URL` - Public URL Poynt delivers webhooks to
//! - `BRIDGE_LOCAL_DELIVERY_METHOD` - Shipping method id treated as local
//!   delivery (default: `mwc_local_delivery`)
//! - `BRIDGE_DEFAULT_CURRENCY` - Store currency code (default: USD)
//! - `BRIDGE_POLL_INTERVAL_SECS` - Job poll interval (default: 5)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use poynt_bridge_core::types::CurrencyCode;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SECRET_LENGTH: usize = 16;

/// Placeholder patterns that must never appear in a real secret
/// (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "changeme",
    "replace",
    "placeholder",
    "example",
    "your-",
    "xxx",
    "todo",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the webhook server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Poynt API configuration
    pub poynt: PoyntConfig,
    /// Sync behavior configuration
    pub sync: SyncConfig,
    /// Shared secret for verifying inbound webhook signatures
    pub webhook_secret: SecretString,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Poynt API configuration.
///
/// Implements `Debug` manually to redact the private key.
#[derive(Clone)]
pub struct PoyntConfig {
    /// Poynt service base URL
    pub base_url: String,
    /// Business identifier, first segment of every resource route
    pub business_id: String,
    /// Application identifier used for token grants and webhook registration
    pub application_id: String,
    /// Key used to sign token-grant assertions (server-side only)
    pub private_key: SecretString,
    /// Public URL webhook events are delivered to
    pub delivery_url: String,
}

impl std::fmt::Debug for PoyntConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoyntConfig")
            .field("base_url", &self.base_url)
            .field("business_id", &self.business_id)
            .field("application_id", &self.application_id)
            .field("private_key", &"[REDACTED]")
            .field("delivery_url", &self.delivery_url)
            .finish()
    }
}

/// Sync behavior configuration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Shipping method identifier treated as local delivery; anything else
    /// is pickup fulfillment
    pub local_delivery_method: String,
    /// Store-wide default currency, used when a record carries none
    pub default_currency: CurrencyCode,
    /// Seconds between job-queue polls
    pub poll_interval_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail placeholder/length validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("BRIDGE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("BRIDGE_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("BRIDGE_PORT", "3100")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("BRIDGE_PORT".to_string(), e.to_string()))?;

        Ok(Self {
            host,
            port,
            poynt: PoyntConfig::from_env()?,
            sync: SyncConfig::from_env()?,
            webhook_secret: get_validated_secret("BRIDGE_WEBHOOK_SECRET")?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PoyntConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_env_or_default("POYNT_API_URL", "https://services.poynt.net"),
            business_id: get_required_env("POYNT_BUSINESS_ID")?,
            application_id: get_required_env("POYNT_APPLICATION_ID")?,
            private_key: get_validated_secret("POYNT_PRIVATE_KEY")?,
            delivery_url: get_env_or_default(
                "BRIDGE_DELIVERY_URL",
                "http://127.0.0.1:3100/webhooks/poynt",
            ),
        })
    }
}

impl SyncConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let currency_raw = get_env_or_default("BRIDGE_DEFAULT_CURRENCY", "USD");
        let default_currency = CurrencyCode::parse(&currency_raw).map_err(|e| {
            ConfigError::InvalidEnvVar("BRIDGE_DEFAULT_CURRENCY".to_string(), e.to_string())
        })?;
        let poll_interval_secs = get_env_or_default("BRIDGE_POLL_INTERVAL_SECS", "5")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BRIDGE_POLL_INTERVAL_SECS".to_string(), e.to_string())
            })?;

        Ok(Self {
            local_delivery_method: get_env_or_default(
                "BRIDGE_LOCAL_DELIVERY_METHOD",
                "mwc_local_delivery",
            ),
            default_currency,
            poll_interval_secs,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a secret is not a placeholder and is long enough to be real.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    if secret.len() < MIN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_SECRET_LENGTH} characters (got {})",
                secret.len()
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

/// Expose a secret for request signing. Kept as a function so call sites
/// show up in a grep.
#[must_use]
pub fn secret_bytes(secret: &SecretString) -> &[u8] {
    secret.expose_secret().as_bytes()
}
