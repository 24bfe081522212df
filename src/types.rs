//! Response types for current price queries

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-coin entry in a simple price response
///
/// Prices are keyed by vs currency code (`"usd"`, `"eur"`, ...). The
/// update timestamp is present because every request asks for it, but
/// CoinGecko omits it for some coins.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinQuote {
    /// Unix timestamp (seconds) of the last price update
    #[serde(default)]
    pub last_updated_at: Option<i64>,

    /// Price per vs currency
    #[serde(flatten)]
    pub prices: HashMap<String, f64>,
}

/// Response from the simple price endpoint, keyed by coin id
#[derive(Debug, Clone, Deserialize)]
pub struct SimplePriceResponse {
    #[serde(flatten)]
    pub coins: HashMap<String, CoinQuote>,
}

impl SimplePriceResponse {
    /// Price for a single coin and vs currency, when present
    pub fn price(&self, id: &str, vs_currency: &str) -> Option<f64> {
        self.coins
            .get(id)
            .and_then(|coin| coin.prices.get(vs_currency))
            .copied()
    }

    /// Extracts one quote per coin for the given vs currency
    ///
    /// Coins missing the currency or the update timestamp are skipped
    /// with a warning rather than failing the whole response.
    pub fn quotes(&self, vs_currency: &str) -> Vec<PriceQuote> {
        let mut quotes = Vec::with_capacity(self.coins.len());
        for (id, coin) in &self.coins {
            let price = coin.prices.get(vs_currency).copied();
            let last_updated = coin
                .last_updated_at
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single());
            match (price, last_updated) {
                (Some(price), Some(last_updated)) => quotes.push(PriceQuote {
                    id: id.clone(),
                    price,
                    last_updated,
                }),
                _ => tracing::warn!(
                    coin = %id,
                    vs_currency,
                    "skipping quote with missing price or timestamp"
                ),
            }
        }
        quotes
    }
}

/// A parsed price quote for one coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    /// CoinGecko coin id (e.g. "bitcoin")
    pub id: String,

    /// Price in the requested vs currency
    pub price: f64,

    /// When CoinGecko last updated this price
    pub last_updated: DateTime<Utc>,
}

impl PriceQuote {
    /// Check if the quote is older than `expiry_seconds`
    ///
    /// `expiry_seconds` normally comes from
    /// [`Config::cache_expiry`](crate::config::Config::cache_expiry).
    pub fn is_stale(&self, expiry_seconds: u64) -> bool {
        let now = Utc::now();
        let age = now.signed_duration_since(self.last_updated);
        age.num_seconds() > expiry_seconds as i64
    }

    /// Get the age of the quote
    pub fn age(&self) -> std::time::Duration {
        let now = Utc::now();
        let duration = now.signed_duration_since(self.last_updated);
        std::time::Duration::from_secs(duration.num_seconds().max(0) as u64)
    }
}
