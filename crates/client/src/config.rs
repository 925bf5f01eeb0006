//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `TILLPOINT_API_URL` - Base URL of the REST API (default: `http://localhost:8000/api`)
//! - `TILLPOINT_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//! - `TILLPOINT_SESSION_FILE` - Where credentials are persisted (default: `.tillpoint-session.json`)
//! - `TILLPOINT_CURRENCY` - Display currency code (default: `GHS`)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tillpoint_core::CurrencyCode;
use url::Url;

/// Local development endpoint used when no API URL is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SESSION_FILE: &str = ".tillpoint-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API. Always ends with `/`.
    pub api_url: Url,
    /// Timeout applied to every HTTP request.
    pub timeout: Duration,
    /// Path of the persisted session document.
    pub session_file: PathBuf,
    /// Currency used when formatting amounts for display.
    pub currency: CurrencyCode,
}

impl Default for ClientConfig {
    #[allow(clippy::unwrap_used)] // DEFAULT_API_URL is a valid absolute URL
    fn default() -> Self {
        Self {
            api_url: parse_base_url(DEFAULT_API_URL).unwrap(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            currency: CurrencyCode::default(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_env_or_default("TILLPOINT_API_URL", DEFAULT_API_URL);
        let api_url = parse_base_url(&api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("TILLPOINT_API_URL".to_string(), e))?;

        let timeout_secs = get_env_or_default("TILLPOINT_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("TILLPOINT_TIMEOUT_SECS".to_string(), e.to_string())
            })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "TILLPOINT_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let session_file =
            PathBuf::from(get_env_or_default("TILLPOINT_SESSION_FILE", DEFAULT_SESSION_FILE));

        let currency = match get_optional_env("TILLPOINT_CURRENCY") {
            Some(code) => parse_currency(&code).ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "TILLPOINT_CURRENCY".to_string(),
                    format!("unsupported currency {code:?}"),
                )
            })?,
            None => CurrencyCode::default(),
        };

        Ok(Self {
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            session_file,
            currency,
        })
    }

    /// Build a config pointing at a specific API URL, other settings default.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL is not absolute http(s).
    pub fn with_api_url(api_url: &str) -> Result<Self, ConfigError> {
        let api_url = parse_base_url(api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("api_url".to_string(), e))?;
        Ok(Self {
            api_url,
            ..Self::default()
        })
    }
}

/// Parse a base URL and make sure it ends with `/` so relative joins keep
/// the path prefix (`/api` + `products/` = `/api/products/`).
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme {:?}", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_currency(code: &str) -> Option<CurrencyCode> {
    match code.trim().to_ascii_uppercase().as_str() {
        "GHS" => Some(CurrencyCode::GHS),
        "USD" => Some(CurrencyCode::USD),
        "EUR" => Some(CurrencyCode::EUR),
        "GBP" => Some(CurrencyCode::GBP),
        "NGN" => Some(CurrencyCode::NGN),
        _ => None,
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}
