//! CoinGecko API client

use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::config::Config;
use crate::constants::{API_KEY_HEADER, SIMPLE_PRICE_ENDPOINT, USER_AGENT};
use crate::error::{ApiError, ConfigError};
use crate::retry::{self, RetryPolicy};
use crate::types::SimplePriceResponse;

/// Longest body fragment echoed back inside error messages
const ERROR_SNIPPET_CHARS: usize = 256;

/// Error payload CoinGecko attaches to non-success statuses. Two shapes
/// appear in the wild plus a bare `message`; all are tolerated.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    status: Option<ErrorStatus>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorStatus {
    #[serde(default)]
    error_message: Option<String>,
}

/// Client for the CoinGecko cryptocurrency price API
///
/// Construction validates the configuration and builds the underlying
/// HTTP client once. The client is cheap to clone and safe to share
/// across tasks.
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    config: Config,
}

impl CoinGeckoClient {
    /// Creates a client from a configuration
    ///
    /// The API key, when configured, is attached to every request via
    /// the `x-cg-pro-api-key` header.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        if let Some(key) = &config.api_key {
            let value = header::HeaderValue::from_str(key).map_err(|_| {
                ConfigError::InvalidApiKey("key contains characters not allowed in a header".to_string())
            })?;
            headers.insert(API_KEY_HEADER, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::ClientInit(e.to_string()))?;

        tracing::debug!(config = %config.summary(), "Created CoinGecko client");
        Ok(Self { client, config })
    }

    /// Creates a client with the default configuration (public API, no key)
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::new(Config::default())
    }

    /// Creates a client configured from the environment, including `.env`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(Config::load()?)
    }

    /// The configuration this client was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetches current prices for the given coin ids
    ///
    /// `vs_currencies` defaults to `["usd"]` when empty. The response
    /// always includes the last-updated timestamp per coin.
    ///
    /// # Errors
    ///
    /// `Validation` when `ids` is empty, otherwise the usual taxonomy
    /// for transport and API failures.
    pub async fn simple_price(
        &self,
        ids: &[&str],
        vs_currencies: &[&str],
    ) -> Result<SimplePriceResponse, ApiError> {
        if ids.is_empty() {
            return Err(ApiError::validation("at least one coin id must be provided"));
        }
        let vs_currencies: Vec<&str> = if vs_currencies.is_empty() {
            vec!["usd"]
        } else {
            vs_currencies.to_vec()
        };

        let ids_csv = ids.join(",");
        let vs_csv = vs_currencies.join(",");
        tracing::debug!(ids = %ids_csv, vs_currencies = %vs_csv, "Fetching simple price");

        let query = [
            ("ids", ids_csv),
            ("vs_currencies", vs_csv),
            ("include_last_updated_at", "true".to_string()),
        ];
        let response: SimplePriceResponse = self.get_json(SIMPLE_PRICE_ENDPOINT, &query).await?;
        tracing::debug!(coins = response.coins.len(), "Fetched simple price");
        Ok(response)
    }

    /// [`simple_price`](Self::simple_price) wrapped in the default retry
    /// policy. Only transient failures are retried.
    pub async fn simple_price_with_retry(
        &self,
        ids: &[&str],
        vs_currencies: &[&str],
    ) -> Result<SimplePriceResponse, ApiError> {
        let policy = RetryPolicy::default();
        retry::run(&policy, || self.simple_price(ids, vs_currencies)).await
    }

    /// Performs a GET against `path` (joined to the base URL) and decodes
    /// the JSON body
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        tracing::debug!(url = %url, "Sending request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_for_status(status, response).await);
        }

        // the configured timeout spans the body read as well
        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;
        serde_json::from_str(&body).map_err(|e| {
            ApiError::invalid_response(format!(
                "Failed to parse response: {}. Body: {}",
                e,
                snippet(&body, ERROR_SNIPPET_CHARS)
            ))
        })
    }

    /// Classifies a transport failure, keeping timeouts distinct from
    /// other network errors
    fn transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout {
                seconds: self.config.request_timeout,
            }
        } else {
            ApiError::Network(e)
        }
    }
}

/// Maps a non-success response to the error taxonomy, decoding the
/// error body when one is present
async fn error_for_status(status: StatusCode, response: reqwest::Response) -> ApiError {
    let retry_after = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());

    let body = response.text().await.unwrap_or_default();
    let message = decode_error_message(&body);
    tracing::warn!(status = status.as_u16(), message = %message, "API request failed");

    match status {
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited { retry_after },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        StatusCode::BAD_REQUEST => ApiError::BadRequest(message),
        _ => ApiError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

/// Pulls a human-readable message out of an error body, trying the
/// `error` key first, then `status.error_message`, then `message`, and
/// finally falling back to the raw body
fn decode_error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(error) = parsed.error {
            return error;
        }
        if let Some(message) = parsed.status.and_then(|s| s.error_message) {
            return message;
        }
        if let Some(message) = parsed.message {
            return message;
        }
    }

    let raw = body.trim();
    if raw.is_empty() {
        "no error details provided".to_string()
    } else {
        snippet(raw, ERROR_SNIPPET_CHARS)
    }
}

/// Truncates a string to at most `max_chars` characters
fn snippet(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_ids_are_rejected_before_any_request() {
        let client = CoinGeckoClient::with_defaults().unwrap();
        let result = client.simple_price(&[], &["usd"]).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let config = Config {
            request_timeout: 0,
            ..Config::default()
        };
        assert!(matches!(
            CoinGeckoClient::new(config),
            Err(ConfigError::InvalidTimeout(0))
        ));
    }

    #[test]
    fn test_error_key_takes_precedence() {
        let body = r#"{"error": "coin not found", "message": "something else"}"#;
        assert_eq!(decode_error_message(body), "coin not found");
    }

    #[test]
    fn test_nested_status_message_is_decoded() {
        let body = r#"{"status": {"error_code": 429, "error_message": "You've exceeded the Rate Limit"}}"#;
        assert_eq!(decode_error_message(body), "You've exceeded the Rate Limit");
    }

    #[test]
    fn test_bare_message_is_decoded() {
        let body = r#"{"message": "Resource not found"}"#;
        assert_eq!(decode_error_message(body), "Resource not found");
    }

    #[test]
    fn test_non_json_body_falls_back_to_raw_text() {
        assert_eq!(decode_error_message("<html>oops</html>"), "<html>oops</html>");
        assert_eq!(decode_error_message(""), "no error details provided");
        assert_eq!(decode_error_message("   "), "no error details provided");
    }

    #[test]
    fn test_json_without_known_keys_falls_back_to_raw_text() {
        let body = r#"{"unexpected": true}"#;
        assert_eq!(decode_error_message(body), body);
    }

    #[test]
    fn test_snippets_are_bounded() {
        let long = "x".repeat(1000);
        let cut = snippet(&long, 10);
        assert_eq!(cut, format!("{}...", "x".repeat(10)));
        assert_eq!(snippet("short", 10), "short");
    }

    #[tokio::test]
    async fn test_timeout_during_body_read_is_classified_as_timeout() {
        use tokio::io::AsyncWriteExt;
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // headers promise a body that never arrives
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let _ = socket
                    .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\n")
                    .await;
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
        });

        let config = Config {
            base_url: format!("http://{addr}"),
            request_timeout: 1,
            ..Config::default()
        };
        let client = CoinGeckoClient::new(config).unwrap();

        let result: Result<serde_json::Value, _> = client.get_json("/stall", &[]).await;
        match result {
            Err(ApiError::Timeout { seconds }) => assert_eq!(seconds, 1),
            other => panic!("expected a timeout, got {other:?}"),
        }
    }

    // Network tests hit the public API and are ignored by default.
    // Run with: cargo test -- --ignored

    #[tokio::test]
    #[ignore]
    async fn test_fetches_bitcoin_price_from_live_api() {
        let client = CoinGeckoClient::with_defaults().unwrap();
        let response = client.simple_price(&["bitcoin"], &["usd"]).await.unwrap();
        let price = response.price("bitcoin", "usd").unwrap();
        assert!(price > 0.0);
    }

    #[tokio::test]
    #[ignore]
    async fn test_unknown_coins_come_back_empty() {
        let client = CoinGeckoClient::with_defaults().unwrap();
        let response = client
            .simple_price(&["definitely-not-a-real-coin-id"], &["usd"])
            .await
            .unwrap();
        assert!(response.coins.is_empty());
    }
}
