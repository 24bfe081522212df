//! Constants for the CoinGecko SDK
//!
//! Defaults for every configuration field live here, together with the
//! environment variable names the loader recognizes and the retry knobs.

/// CoinGecko API base URL (public v3 endpoint)
pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// HTTP request timeout when no override is configured (in seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// How long a fetched price stays fresh for caller-side caches (in seconds)
pub const DEFAULT_CACHE_EXPIRY_SECS: u64 = 300;

/// CoinGecko API endpoint for simple price queries
pub const SIMPLE_PRICE_ENDPOINT: &str = "/simple/price";

/// Header carrying the API key on authenticated requests
pub const API_KEY_HEADER: &str = "x-cg-pro-api-key";

/// Minimum plausible length for an API key
pub const MIN_API_KEY_LEN: usize = 10;

/// Maximum number of attempts for retried requests, including the first
pub const MAX_RETRY_ATTEMPTS: u32 = 3;

/// Initial backoff delay for retries (in milliseconds)
pub const INITIAL_BACKOFF_MS: u64 = 1000;

/// Maximum backoff delay for retries (in milliseconds)
pub const MAX_BACKOFF_MS: u64 = 30000;

/// Longest span a historical date range may cover (in days)
pub const MAX_HISTORICAL_DAYS: i64 = 365;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "coingecko-sdk/0.1.0";

// Environment variables recognized by `Config::from_env`. The
// COINGECKO_-prefixed names are canonical; the unprefixed ones are a
// legacy scheme still honored with a warning.

/// API key (optional, CoinGecko Pro)
pub const ENV_API_KEY: &str = "COINGECKO_API_KEY";

/// Base URL override
pub const ENV_BASE_URL: &str = "COINGECKO_API_BASE_URL";

/// Legacy base URL override
pub const ENV_BASE_URL_LEGACY: &str = "COINGECKO_BASE_URL";

/// Request timeout override (seconds)
pub const ENV_REQUEST_TIMEOUT: &str = "COINGECKO_REQUEST_TIMEOUT";

/// Legacy request timeout override
pub const ENV_REQUEST_TIMEOUT_LEGACY: &str = "REQUEST_TIMEOUT";

/// Cache expiry override (seconds)
pub const ENV_CACHE_EXPIRY: &str = "COINGECKO_CACHE_EXPIRY";

/// Legacy cache expiry override
pub const ENV_CACHE_EXPIRY_LEGACY: &str = "CACHE_EXPIRY";

/// Log level override
pub const ENV_LOG_LEVEL: &str = "COINGECKO_LOG_LEVEL";

/// Legacy log level override
pub const ENV_LOG_LEVEL_LEGACY: &str = "LOG_LEVEL";
