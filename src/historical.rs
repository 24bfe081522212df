//! Historical price retrieval via market charts

use chrono::{NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::client::CoinGeckoClient;
use crate::error::ApiError;

/// Sampling granularity for historical data
///
/// When omitted, CoinGecko picks an interval from the requested window
/// (5-minutely under a day, hourly up to 90 days, daily beyond).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Daily,
    Hourly,
}

impl Granularity {
    /// Value sent as the `interval` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Hourly => "hourly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `[timestamp, value]` pair from a market chart. The
/// timestamp is in milliseconds, as the API sends it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint(pub i64, pub f64);

impl PricePoint {
    /// Timestamp in milliseconds
    pub fn timestamp_ms(&self) -> i64 {
        self.0
    }

    /// The sampled value (price, market cap, or volume)
    pub fn value(&self) -> f64 {
        self.1
    }
}

/// Market chart response: prices, market caps, and volumes over time
///
/// Series the API leaves out deserialize as empty.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Vec<PricePoint>,
    #[serde(default)]
    pub market_caps: Vec<PricePoint>,
    #[serde(default)]
    pub total_volumes: Vec<PricePoint>,
}

/// A historical price sample with the timestamp normalized to whole
/// seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistoricalPrice {
    /// Unix timestamp in seconds
    pub timestamp: i64,
    /// Price in the requested vs currency
    pub price: f64,
}

impl CoinGeckoClient {
    /// Fetches the market chart for a coin
    ///
    /// # Arguments
    ///
    /// * `coin_id` - CoinGecko coin id (e.g. "bitcoin")
    /// * `vs_currency` - target currency (e.g. "usd")
    /// * `days` - how far back the chart reaches
    /// * `granularity` - optional sampling interval
    pub async fn market_chart(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
        granularity: Option<Granularity>,
    ) -> Result<MarketChart, ApiError> {
        if coin_id.trim().is_empty() {
            return Err(ApiError::validation("coin id must be provided"));
        }
        if vs_currency.trim().is_empty() {
            return Err(ApiError::validation("vs currency must be provided"));
        }
        if days == 0 {
            return Err(ApiError::validation("days must be a positive integer"));
        }

        let path = format!("/coins/{coin_id}/market_chart");
        let mut query = vec![
            ("vs_currency", vs_currency.to_string()),
            ("days", days.to_string()),
        ];
        if let Some(granularity) = granularity {
            query.push(("interval", granularity.as_str().to_string()));
        }

        tracing::debug!(coin_id, vs_currency, days, "Fetching market chart");
        let chart: MarketChart = self.get_json(&path, &query).await?;
        tracing::debug!(points = chart.prices.len(), "Fetched market chart");
        Ok(chart)
    }

    /// Fetches historical prices with timestamps normalized to whole
    /// seconds
    pub async fn historical_prices(
        &self,
        coin_id: &str,
        vs_currency: &str,
        days: u32,
        granularity: Option<Granularity>,
    ) -> Result<Vec<HistoricalPrice>, ApiError> {
        let chart = self
            .market_chart(coin_id, vs_currency, days, granularity)
            .await?;
        Ok(to_seconds(&chart.prices))
    }

    /// Price of a coin on a specific UTC calendar date
    ///
    /// Fetches a window reaching back to `date` and returns the first
    /// sample falling on that date, or `None` when the API has no data
    /// for it.
    pub async fn price_on_date(
        &self,
        coin_id: &str,
        date: NaiveDate,
        vs_currency: &str,
    ) -> Result<Option<f64>, ApiError> {
        let today = Utc::now().date_naive();
        if date > today {
            return Err(ApiError::validation("date cannot be in the future"));
        }

        let days_ago = (today - date).num_days();
        let days = (days_ago + 1) as u32;

        let prices = self
            .historical_prices(coin_id, vs_currency, days, None)
            .await?;
        Ok(find_price_on(&prices, date))
    }
}

/// Converts chart points from millisecond to second timestamps
fn to_seconds(points: &[PricePoint]) -> Vec<HistoricalPrice> {
    points
        .iter()
        .map(|point| HistoricalPrice {
            timestamp: point.0 / 1000,
            price: point.1,
        })
        .collect()
}

/// First price whose timestamp falls on the given UTC date
fn find_price_on(prices: &[HistoricalPrice], date: NaiveDate) -> Option<f64> {
    prices.iter().find_map(|sample| {
        let datetime = Utc.timestamp_opt(sample.timestamp, 0).single()?;
        (datetime.date_naive() == date).then_some(sample.price)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_points_deserialize_from_pairs() {
        let points: Vec<PricePoint> =
            serde_json::from_str("[[1625097600000, 35000.5], [1625184000000, 35500.0]]").unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].timestamp_ms(), 1625097600000);
        assert_eq!(points[0].value(), 35000.5);
    }

    #[test]
    fn test_missing_series_deserialize_as_empty() {
        let chart: MarketChart =
            serde_json::from_str(r#"{"prices": [[1625097600000, 35000.5]]}"#).unwrap();
        assert_eq!(chart.prices.len(), 1);
        assert!(chart.market_caps.is_empty());
        assert!(chart.total_volumes.is_empty());
    }

    #[test]
    fn test_timestamps_convert_to_seconds() {
        let points = [
            PricePoint(1625097600000, 35000.5),
            PricePoint(1625184000123, 35500.0),
        ];
        let prices = to_seconds(&points);
        assert_eq!(prices[0].timestamp, 1625097600);
        assert_eq!(prices[0].price, 35000.5);
        // sub-second precision is dropped
        assert_eq!(prices[1].timestamp, 1625184000);
    }

    #[test]
    fn test_finds_price_on_matching_date() {
        // 2021-07-01 and 2021-07-02, two samples on the second day
        let prices = [
            HistoricalPrice {
                timestamp: 1625097600,
                price: 35000.5,
            },
            HistoricalPrice {
                timestamp: 1625184000,
                price: 35500.0,
            },
            HistoricalPrice {
                timestamp: 1625227200,
                price: 35700.0,
            },
        ];

        let date = NaiveDate::from_ymd_opt(2021, 7, 2).unwrap();
        assert_eq!(find_price_on(&prices, date), Some(35500.0));

        let missing = NaiveDate::from_ymd_opt(2021, 7, 5).unwrap();
        assert_eq!(find_price_on(&prices, missing), None);
    }

    #[test]
    fn test_granularity_query_values() {
        assert_eq!(Granularity::Daily.as_str(), "daily");
        assert_eq!(Granularity::Hourly.as_str(), "hourly");
        assert_eq!(Granularity::Hourly.to_string(), "hourly");
    }

    #[tokio::test]
    async fn test_blank_ids_are_rejected_before_any_request() {
        let client = CoinGeckoClient::with_defaults().unwrap();

        let result = client.market_chart("", "usd", 7, None).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));

        let result = client.market_chart("bitcoin", "  ", 7, None).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));

        let result = client.market_chart("bitcoin", "usd", 0, None).await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    async fn test_future_dates_are_rejected() {
        let client = CoinGeckoClient::with_defaults().unwrap();
        let tomorrow = Utc::now().date_naive() + chrono::Duration::days(1);

        let result = client.price_on_date("bitcoin", tomorrow, "usd").await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }

    #[tokio::test]
    #[ignore]
    async fn test_fetches_weekly_chart_from_live_api() {
        let client = CoinGeckoClient::with_defaults().unwrap();
        let chart = client
            .market_chart("bitcoin", "usd", 7, Some(Granularity::Daily))
            .await
            .unwrap();
        assert!(!chart.prices.is_empty());
        assert!(chart.prices.iter().all(|p| p.value() > 0.0));
    }
}
