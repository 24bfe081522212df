//! Validation and shaping helpers for market chart data

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::error::ApiError;
use crate::historical::PricePoint;

/// A chart point enriched with a parsed datetime
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedPrice {
    /// Original timestamp in milliseconds
    pub timestamp_ms: i64,
    /// The same instant as a UTC datetime
    pub datetime: DateTime<Utc>,
    /// Price at that instant
    pub price: f64,
}

/// Checks chart points for representable timestamps and sane prices
///
/// The first invalid point is logged at WARN and fails the whole batch.
pub fn validate_points(points: &[PricePoint]) -> bool {
    for point in points {
        if Utc.timestamp_millis_opt(point.0).single().is_none() {
            tracing::warn!(timestamp_ms = point.0, "Invalid timestamp in chart data");
            return false;
        }
        if !point.1.is_finite() || point.1 < 0.0 {
            tracing::warn!(price = point.1, "Invalid price in chart data");
            return false;
        }
    }
    true
}

/// Transforms raw chart points into dated prices
///
/// # Errors
///
/// `Validation` when any point fails [`validate_points`]
pub fn transform_points(points: &[PricePoint]) -> Result<Vec<DatedPrice>, ApiError> {
    if !validate_points(points) {
        return Err(ApiError::validation("invalid historical price data"));
    }

    let mut out = Vec::with_capacity(points.len());
    for point in points {
        // validate_points guarantees the timestamp is representable
        if let Some(datetime) = Utc.timestamp_millis_opt(point.0).single() {
            out.push(DatedPrice {
                timestamp_ms: point.0,
                datetime,
                price: point.1,
            });
        }
    }
    Ok(out)
}

/// Filters dated prices by optional time and price bounds, all inclusive
pub fn filter_points(
    points: &[DatedPrice],
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    min_price: Option<f64>,
    max_price: Option<f64>,
) -> Vec<DatedPrice> {
    points
        .iter()
        .filter(|point| {
            if start.is_some_and(|start| point.datetime < start) {
                return false;
            }
            if end.is_some_and(|end| point.datetime > end) {
                return false;
            }
            if min_price.is_some_and(|min| point.price < min) {
                return false;
            }
            if max_price.is_some_and(|max| point.price > max) {
                return false;
            }
            true
        })
        .cloned()
        .collect()
}
