//! Error types for the CoinGecko SDK

use thiserror::Error;

/// Errors that can occur when loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Base URL is not a valid HTTP(S) endpoint
    #[error("Invalid base URL `{0}`: must be an http(s) URL")]
    InvalidBaseUrl(String),

    /// Request timeout must be positive
    #[error("Invalid request timeout {0}: must be greater than zero")]
    InvalidTimeout(u64),

    /// Log level outside the recognized set
    #[error("Invalid log level `{0}`: must be one of DEBUG, INFO, WARNING, ERROR, CRITICAL")]
    InvalidLogLevel(String),

    /// API key failed sanity checks
    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    /// An environment variable held a value that could not be parsed
    #[error("Invalid value `{value}` for {name}: {reason}")]
    InvalidEnvVar {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// The HTTP client could not be built from these settings
    #[error("Failed to initialize HTTP client: {0}")]
    ClientInit(String),
}

/// Errors that can occur when talking to the CoinGecko API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network request failed
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded")]
    RateLimited { retry_after: Option<u64> },

    /// Authentication failed (HTTP 401/403)
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// Requested resource does not exist (HTTP 404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The API rejected the request (HTTP 400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Any other non-success status from the API
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Request parameters failed local validation
    #[error("Invalid parameters: {0}")]
    Validation(String),
}

impl ApiError {
    /// Creates a Validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates an InvalidResponse error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// True for failures worth retrying: transient network errors,
    /// timeouts, rate limiting, and server-side (5xx) errors
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout { .. } | ApiError::RateLimited { .. } => true,
            ApiError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status associated with the error, when one exists
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            ApiError::RateLimited { .. } => Some(429),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::NotFound(_) => Some(404),
            ApiError::BadRequest(_) => Some(400),
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
