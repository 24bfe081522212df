//! # CoinGecko SDK
//!
//! A client for the CoinGecko cryptocurrency API: current prices for any
//! listed coin, historical market charts, and the validation and retry
//! plumbing around them.
//!
//! ## Usage
//!
//! Configuration comes from explicit values or the environment (a `.env`
//! file in the working directory is honored):
//!
//! ```no_run
//! use coingecko_sdk::{CoinGeckoClient, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let client = CoinGeckoClient::new(config)?;
//!
//! // Current prices
//! let response = client.simple_price(&["bitcoin", "ethereum"], &["usd"]).await?;
//! for quote in response.quotes("usd") {
//!     println!("{}: ${:.2}", quote.id, quote.price);
//! }
//!
//! // A week of daily history
//! let prices = client.historical_prices("bitcoin", "usd", 7, None).await?;
//! println!("{} samples", prices.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment variables
//!
//! `COINGECKO_API_KEY`, `COINGECKO_API_BASE_URL`,
//! `COINGECKO_REQUEST_TIMEOUT`, `COINGECKO_CACHE_EXPIRY`, and
//! `COINGECKO_LOG_LEVEL`. The older unprefixed names (`REQUEST_TIMEOUT`,
//! `CACHE_EXPIRY`, `LOG_LEVEL`, `COINGECKO_BASE_URL`) still work and log
//! a warning.

pub mod client;
pub mod config;
pub mod constants;
pub mod dates;
pub mod error;
pub mod historical;
pub mod logging;
pub mod retry;
pub mod transform;
pub mod types;

// Re-export commonly used types
pub use client::CoinGeckoClient;
pub use config::{Config, LogLevel};
pub use error::{ApiError, ConfigError};
pub use historical::{Granularity, HistoricalPrice, MarketChart, PricePoint};
pub use retry::RetryPolicy;
pub use transform::DatedPrice;
pub use types::{CoinQuote, PriceQuote, SimplePriceResponse};
