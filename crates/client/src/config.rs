//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BACKROOM_API_BASE` - Base URL of the back-office REST API
//!
//! ## Optional
//! - `BACKROOM_HOST` - Host name the client acts as (default: localhost);
//!   the tenant subdomain is derived from this value
//! - `BACKROOM_BRAND` - Brand segment of storage keys (default: backroom)
//! - `BACKROOM_LEGACY_BRAND` - Prior brand segment still honored when
//!   reading stored sessions (default: stockpilot)
//! - `BACKROOM_SIGN_IN_PATH` - Route navigated to on auth failure
//!   (default: /sign-in)
//! - `BACKROOM_SERVICE_TOKEN` - Pre-provisioned bearer token seeded into
//!   the token store (automation use)

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Backroom client configuration.
///
/// Implements `Debug` manually to redact the service token.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the back-office REST API
    pub api_base: Url,
    /// Host name the client acts as; the tenant subdomain derives from it
    pub host: String,
    /// Brand segment embedded in storage keys
    pub brand: String,
    /// Prior brand segment, still honored when reading stored sessions
    pub legacy_brand: String,
    /// Route navigated to when authentication fails
    pub sign_in_path: String,
    /// Pre-provisioned bearer token, if any (automation use)
    pub service_token: Option<SecretString>,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_base", &self.api_base.as_str())
            .field("host", &self.host)
            .field("brand", &self.brand)
            .field("legacy_brand", &self.legacy_brand)
            .field("sign_in_path", &self.sign_in_path)
            .field(
                "service_token",
                &self.service_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl ClientConfig {
    /// Create a configuration with defaults for everything but the API base
    /// and host. Embedders that don't configure via the environment start
    /// here and override fields as needed.
    #[must_use]
    pub fn new(api_base: Url, host: impl Into<String>) -> Self {
        Self {
            api_base,
            host: host.into(),
            brand: "backroom".to_owned(),
            legacy_brand: "stockpilot".to_owned(),
            sign_in_path: "/sign-in".to_owned(),
            service_token: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `BACKROOM_API_BASE` is missing or not a
    /// valid URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// `from_env` routes through this; tests exercise it directly without
    /// mutating the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `BACKROOM_API_BASE` is missing or not a
    /// valid URL.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_base = lookup("BACKROOM_API_BASE")
            .ok_or_else(|| ConfigError::MissingEnvVar("BACKROOM_API_BASE".to_owned()))?;
        let api_base = Url::parse(&api_base)
            .map_err(|e| ConfigError::InvalidEnvVar("BACKROOM_API_BASE".to_owned(), e.to_string()))?;

        let defaults = Self::new(api_base, "localhost");

        Ok(Self {
            host: lookup("BACKROOM_HOST").unwrap_or(defaults.host),
            brand: lookup("BACKROOM_BRAND").unwrap_or(defaults.brand),
            legacy_brand: lookup("BACKROOM_LEGACY_BRAND").unwrap_or(defaults.legacy_brand),
            sign_in_path: lookup("BACKROOM_SIGN_IN_PATH").unwrap_or(defaults.sign_in_path),
            service_token: lookup("BACKROOM_SERVICE_TOKEN").map(SecretString::from),
            api_base: defaults.api_base,
        })
    }
}
