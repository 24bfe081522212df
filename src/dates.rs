//! Date parsing and range validation for historical queries

use chrono::{DateTime, NaiveDate, Utc};

use crate::constants::MAX_HISTORICAL_DAYS;
use crate::error::ApiError;

/// Parses a date from `YYYY-MM-DD` or an RFC 3339 datetime
///
/// Datetimes are converted to their UTC calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate, ApiError> {
    let trimmed = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.with_timezone(&Utc).date_naive());
    }
    Err(ApiError::validation(format!(
        "invalid date `{trimmed}`: expected YYYY-MM-DD or an RFC 3339 datetime"
    )))
}

/// Validates a date range for historical retrieval
///
/// The range must be chronological, span at most
/// [`MAX_HISTORICAL_DAYS`], and not reach into the future. Today (UTC)
/// is allowed.
pub fn validate_date_range(
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), ApiError> {
    if start > end {
        return Err(ApiError::validation(
            "start date must be before or equal to end date",
        ));
    }

    if (end - start).num_days() > MAX_HISTORICAL_DAYS {
        return Err(ApiError::validation(format!(
            "date range cannot exceed {MAX_HISTORICAL_DAYS} days"
        )));
    }

    let today = Utc::now().date_naive();
    if end > today {
        return Err(ApiError::validation("dates cannot be in the future"));
    }

    Ok((start, end))
}

/// String-input variant of [`validate_date_range`]
pub fn validate_date_range_str(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate), ApiError> {
    validate_date_range(parse_date(start)?, parse_date(end)?)
}
