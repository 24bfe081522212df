//! Configuration for the CoinGecko SDK
//!
//! Settings are read once at construction time, either from explicit
//! values or from the process environment (optionally seeded from a
//! `.env` file). Nothing re-reads the environment after that.

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_CACHE_EXPIRY_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, ENV_API_KEY,
    ENV_BASE_URL, ENV_BASE_URL_LEGACY, ENV_CACHE_EXPIRY, ENV_CACHE_EXPIRY_LEGACY, ENV_LOG_LEVEL,
    ENV_LOG_LEVEL_LEGACY, ENV_REQUEST_TIMEOUT, ENV_REQUEST_TIMEOUT_LEGACY, MIN_API_KEY_LEN,
};
use crate::error::ConfigError;

/// Log verbosity recognized by the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Canonical uppercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    /// Closest `tracing` level. WARNING maps to WARN; CRITICAL maps to
    /// ERROR since tracing has no level above it.
    pub fn as_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warning => tracing::Level::WARN,
            LogLevel::Error | LogLevel::Critical => tracing::Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARNING" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            "CRITICAL" => Ok(LogLevel::Critical),
            other => Err(ConfigError::InvalidLogLevel(other.to_string())),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for [`CoinGeckoClient`](crate::client::CoinGeckoClient)
///
/// Every field has a default suitable for the public API, so
/// `Config::default()` works without any environment. Overrides come
/// from struct update syntax or [`Config::from_env`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Optional API key for CoinGecko Pro. Keep it in `.env` or the
    /// process environment, never in version control.
    pub api_key: Option<String>,

    /// Root endpoint that API paths are resolved against
    pub base_url: String,

    /// HTTP request timeout in seconds
    pub request_timeout: u64,

    /// Seconds before a fetched price should be considered stale
    pub cache_expiry: u64,

    /// Log verbosity
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            cache_expiry: DEFAULT_CACHE_EXPIRY_SECS,
            log_level: LogLevel::Info,
        }
    }
}

impl Config {
    /// Creates a configuration from environment variables
    ///
    /// Unset variables fall back to defaults; set-but-invalid values are
    /// errors. The canonical names are the `COINGECKO_`-prefixed scheme;
    /// the unprefixed legacy names are honored with a warning.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = get_env(ENV_API_KEY);

        let base_url = get_env_with_legacy(ENV_BASE_URL, ENV_BASE_URL_LEGACY)
            .map(|(value, _)| value)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let request_timeout = get_env_u64(
            ENV_REQUEST_TIMEOUT,
            ENV_REQUEST_TIMEOUT_LEGACY,
            DEFAULT_REQUEST_TIMEOUT_SECS,
        )?;

        let cache_expiry = get_env_u64(
            ENV_CACHE_EXPIRY,
            ENV_CACHE_EXPIRY_LEGACY,
            DEFAULT_CACHE_EXPIRY_SECS,
        )?;

        let log_level = match get_env_with_legacy(ENV_LOG_LEVEL, ENV_LOG_LEVEL_LEGACY) {
            Some((value, _)) => value.parse()?,
            None => LogLevel::Info,
        };

        let config = Self {
            api_key,
            base_url,
            request_timeout,
            cache_expiry,
            log_level,
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads `.env` from the working directory when present, then reads
    /// the environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Validates every field, returning the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|_| ConfigError::InvalidBaseUrl(self.base_url.clone()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidBaseUrl(self.base_url.clone()));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::InvalidTimeout(self.request_timeout));
        }

        if let Some(key) = &self.api_key {
            if key.trim().len() < MIN_API_KEY_LEN {
                return Err(ConfigError::InvalidApiKey(format!(
                    "key is shorter than {MIN_API_KEY_LEN} characters"
                )));
            }
        }

        Ok(())
    }

    /// Log-safe summary. The API key is reported only as present or
    /// absent, never echoed.
    pub fn summary(&self) -> String {
        format!(
            "base_url={} request_timeout={}s cache_expiry={}s log_level={} api_key_set={}",
            self.base_url,
            self.request_timeout,
            self.cache_expiry,
            self.log_level,
            self.api_key.is_some()
        )
    }
}

/// Reads an environment variable, treating blank values as unset
fn get_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Reads `name`, falling back to `legacy` when only the old variable is
/// set. Returns the value together with the variable it came from.
fn get_env_with_legacy(
    name: &'static str,
    legacy: &'static str,
) -> Option<(String, &'static str)> {
    if let Some(value) = get_env(name) {
        return Some((value, name));
    }
    if let Some(value) = get_env(legacy) {
        tracing::warn!(
            legacy = legacy,
            canonical = name,
            "legacy environment variable is set, prefer the canonical name"
        );
        return Some((value, legacy));
    }
    None
}

fn get_env_u64(name: &'static str, legacy: &'static str, default: u64) -> Result<u64, ConfigError> {
    match get_env_with_legacy(name, legacy) {
        Some((value, used)) => value.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            name: used,
            value: value.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
