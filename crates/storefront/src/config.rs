//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; defaults target local development against
//! the public kitchen API.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STOREFRONT_TRUSTED_PROXIES` - Comma-separated proxy IPs whose
//!   `X-Forwarded-For` is believed by the form rate limiter (default: none)
//! - `KITCHEN_API_URL` - Kitchen API base URL (default: <https://yoloverse.pythonanywhere.com/api/>)
//! - `KITCHEN_API_TOKEN` - Bearer token sent to the kitchen API
//! - `KITCHEN_API_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `KITCHEN_CACHE_TTL_SECS` - How long API reads stay fresh (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default kitchen API location.
pub const DEFAULT_KITCHEN_API_URL: &str = "https://yoloverse.pythonanywhere.com/api/";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
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
    /// Reverse proxies allowed to report the client IP
    pub trusted_proxies: Vec<IpAddr>,
    /// Kitchen API configuration
    pub kitchen: KitchenApiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Kitchen API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct KitchenApiConfig {
    /// Base URL, always ending in `/` so endpoint paths join under it
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Time-to-live for cached reads
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for KitchenApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KitchenApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but can't be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            host: parse_env_or("STOREFRONT_HOST", IpAddr::from([127, 0, 0, 1]))?,
            port: parse_env_or("STOREFRONT_PORT", 3000)?,
            base_url: get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000"),
            trusted_proxies: parse_list_env("STOREFRONT_TRUSTED_PROXIES")?,
            kitchen: KitchenApiConfig::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_env_or("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_env_or("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the site is served over HTTPS (decides the secure cookie flag).
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl KitchenApiConfig {
    /// Build a config for `base_url` with default timeout and cache TTL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url("KITCHEN_API_URL", base_url)?,
            token: None,
            timeout: Duration::from_secs(10),
            cache_ttl: Duration::from_secs(300),
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = get_env_or_default("KITCHEN_API_URL", DEFAULT_KITCHEN_API_URL);
        let mut config = Self::new(&base_url)?;
        config.token = get_optional_env("KITCHEN_API_TOKEN").map(SecretString::from);
        config.timeout = Duration::from_secs(parse_env_or("KITCHEN_API_TIMEOUT_SECS", 10)?);
        config.cache_ttl = Duration::from_secs(parse_env_or("KITCHEN_CACHE_TTL_SECS", 300)?);
        Ok(config)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

/// Parse a comma-separated environment variable; unset means empty.
fn parse_list_env<T>(key: &str) -> Result<Vec<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(Vec::new()), |raw| parse_list(key, &raw))
}

fn parse_list<T>(key: &str, raw: &str) -> Result<Vec<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.split(',')
        .filter(|item| !item.trim().is_empty())
        .map(|item| parse_value(key, item))
        .collect()
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse an API base URL and make sure it ends with `/`.
///
/// Without the trailing slash `Url::join("menus/")` would replace the last
/// path segment instead of appending to it.
fn normalize_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url =
        Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
