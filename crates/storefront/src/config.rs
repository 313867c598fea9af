//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPFRONT_BASE_URL` - Public URL for the storefront
//!
//! ## Optional
//! - `SHOPFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `SHOPFRONT_PORT` - Listen port (default: 3000)
//! - `SHOPFRONT_API_URL` - Catalog backend base URL (default: <http://localhost:8080/api/>)
//! - `SHOPFRONT_EDITOR_URL` - External product editor for the add/update forms
//! - `SHOPFRONT_SESSION_DATABASE_URL` - `SQLite` URL for the session store
//!   (default: `sqlite://shopfront-sessions.db?mode=rwc`)
//! - `SHOPFRONT_CACHE_TTL_SECS` - Catalog cache TTL in seconds (default: 300)
//! - `SHOPFRONT_CURRENCY` - ISO 4217 display currency (default: USD)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use shopfront_core::CurrencyCode;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080/api/";
const DEFAULT_SESSION_DATABASE_URL: &str = "sqlite://shopfront-sessions.db?mode=rwc";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session store database URL
    pub session_database_url: String,
    /// Catalog backend configuration
    pub catalog: CatalogConfig,
    /// External product editor (add/update forms live there)
    pub editor_url: Option<Url>,
    /// Currency used when rendering prices
    pub currency: CurrencyCode,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Error event sample rate
    pub sentry_sample_rate: f32,
    /// Performance transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Catalog backend configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL; always ends with `/` so relative joins keep the path prefix
    pub api_url: Url,
    /// How long product lists and images stay cached
    pub cache_ttl: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("SHOPFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("SHOPFRONT_PORT", "3000")?;
        let base_url = get_required_env("SHOPFRONT_BASE_URL")?;
        let session_database_url =
            get_env_or_default("SHOPFRONT_SESSION_DATABASE_URL", DEFAULT_SESSION_DATABASE_URL);

        let catalog = CatalogConfig::from_env()?;
        let editor_url = get_optional_env("SHOPFRONT_EDITOR_URL")
            .map(|raw| parse_base_url("SHOPFRONT_EDITOR_URL", &raw))
            .transpose()?;
        let currency = parse_env("SHOPFRONT_CURRENCY", "USD")?;

        Ok(Self {
            host,
            port,
            base_url,
            session_database_url,
            catalog,
            editor_url,
            currency,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: parse_env("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl CatalogConfig {
    /// Build a catalog config from a base URL string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse.
    pub fn new(api_url: &str, cache_ttl: Duration) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: parse_base_url("SHOPFRONT_API_URL", api_url)?,
            cache_ttl,
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let api_url = get_env_or_default("SHOPFRONT_API_URL", DEFAULT_API_URL);
        let ttl_secs: u64 = parse_env("SHOPFRONT_CACHE_TTL_SECS", "300")?;
        Self::new(&api_url, Duration::from_secs(ttl_secs))
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

/// Parse an environment variable (or its default) into `T`.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a base URL, forcing a trailing slash so `Url::join` appends to it.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
