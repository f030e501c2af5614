//! Date range resolution
//!
//! Turns the relative/absolute date expressions accepted in configuration
//! into concrete UTC timestamps bounding the extraction window.
//!
//! Accepted forms:
//! - `today` or `0` — half an hour before now, so late-arriving writes have
//!   settled before the cutoff
//! - a negative day count, e.g. `-7` — start of the current day (UTC) minus
//!   that many days
//! - `YYYY-MM-DD` — midnight UTC of that date
//!
//! `now` is injected so resolution stays deterministic under test.

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Format used when serializing window bounds into API filters
pub const API_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Resolve a date expression against an explicit `now`
pub fn resolve_at(expr: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let expr = expr.trim();

    if expr.eq_ignore_ascii_case("today") || expr == "0" {
        return Ok(now - Duration::minutes(30));
    }

    if let Some(digits) = expr.strip_prefix('-') {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            let days: i64 = digits
                .parse()
                .map_err(|_| Error::invalid_date(expr))?;
            let start_of_day = now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .expect("midnight is always a valid time")
                .and_utc();
            return Ok(start_of_day - Duration::days(days));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(expr, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .expect("midnight is always a valid time")
            .and_utc();
        return Ok(midnight);
    }

    Err(Error::invalid_date(expr))
}

/// Resolve a date expression against the current time
pub fn resolve(expr: &str) -> Result<DateTime<Utc>> {
    resolve_at(expr, Utc::now())
}

/// Resolve both window bounds and enforce `from < to`
pub fn window_at(
    from: &str,
    to: &str,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let from_ts = resolve_at(from, now)?;
    let to_ts = resolve_at(to, now)?;

    if from_ts >= to_ts {
        return Err(Error::InvalidDateRange {
            from: from_ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            to: to_ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        });
    }

    Ok((from_ts, to_ts))
}

/// Resolve both window bounds against the current time
pub fn window(from: &str, to: &str) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    window_at(from, to, Utc::now())
}
