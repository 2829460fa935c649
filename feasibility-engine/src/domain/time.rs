//! Timestamp and duration parsing for loosely-typed flight payloads.
//!
//! Flight-ops payloads carry times as RFC 3339 strings, zone-less ISO strings
//! (treated as UTC), or epoch numbers in seconds or milliseconds. Durations
//! arrive as whole minutes or `H:MM` strings. Every parser here returns
//! `None` rather than an error: a malformed value is an unknown value.

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Epoch values above this are treated as milliseconds.
const MILLIS_THRESHOLD: f64 = 1e11;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a timestamp string into UTC.
///
/// # Examples
///
/// ```
/// use feasibility_engine::domain::parse_utc;
///
/// let dt = parse_utc("2025-11-19T08:00:00-07:00").unwrap();
/// assert_eq!(dt.to_rfc3339(), "2025-11-19T15:00:00+00:00");
///
/// let naive = parse_utc("2025-11-19 15:00").unwrap();
/// assert_eq!(naive, dt);
///
/// assert!(parse_utc("tomorrow").is_none());
/// ```
pub fn parse_utc(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Convert an epoch number (seconds or milliseconds) into UTC.
pub fn from_epoch(value: f64) -> Option<DateTime<Utc>> {
    if !value.is_finite() {
        return None;
    }
    let secs = if value > MILLIS_THRESHOLD {
        value / 1000.0
    } else {
        value
    };
    let whole = secs.trunc();
    let nanos = ((secs - whole) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

/// Parse a duration in minutes from `"H:MM"` or a plain number string.
///
/// ```
/// use feasibility_engine::domain::parse_minutes;
///
/// assert_eq!(parse_minutes("6:40"), Some(400));
/// assert_eq!(parse_minutes(" 75 "), Some(75));
/// assert_eq!(parse_minutes("-5"), None);
/// assert_eq!(parse_minutes("soon"), None);
/// ```
pub fn parse_minutes(s: &str) -> Option<u32> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some((hours, mins)) = trimmed.split_once(':') {
        let hours: u32 = hours.trim().parse().ok()?;
        let mins: u32 = if mins.trim().is_empty() {
            0
        } else {
            mins.trim().parse().ok()?
        };
        if mins >= 60 {
            return None;
        }
        return hours.checked_mul(60)?.checked_add(mins);
    }

    minutes_from_number(trimmed.parse().ok()?)
}

/// Round a numeric minute value, rejecting negatives and non-finite input.
pub fn minutes_from_number(value: f64) -> Option<u32> {
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
        return None;
    }
    Some(value.round() as u32)
}

/// Format minutes as zero-padded `HH:MM`. Negative input clamps to zero.
pub fn format_hhmm(minutes: i64) -> String {
    let minutes = minutes.max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Resolve an IANA zone name, falling back to UTC.
pub fn zone_or_utc(name: Option<&str>) -> Tz {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => name.parse().unwrap_or_else(|_| {
            tracing::trace!(zone = name, "unknown time zone, using UTC");
            chrono_tz::UTC
        }),
        None => chrono_tz::UTC,
    }
}

/// Express a UTC instant in the named zone (UTC when unknown).
pub fn localize(dt: DateTime<Utc>, zone: Option<&str>) -> DateTime<Tz> {
    dt.with_timezone(&zone_or_utc(zone))
}
