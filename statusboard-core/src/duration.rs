//! Timestamp parsing and run-duration formatting

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

/// Duration reported when the start of a run is missing or unreadable
pub const UNKNOWN_DURATION: &str = "unknown";

/// Naive layouts accepted in addition to RFC 3339; read as UTC
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses a timestamp as written by the live-state producers
///
/// Returns `None` for anything unreadable instead of an error.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Formats a span as `{h}h {m}m` from one hour upwards, else `{m}m {s}s`
///
/// Negative spans are clamped to zero.
pub fn format_duration(span: TimeDelta) -> String {
    let total = span.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours >= 1 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m {}s", minutes, seconds)
    }
}

/// Formatted run time between `started_at` and `completed_at`
pub fn run_duration(started_at: Option<&str>, completed_at: DateTime<Utc>) -> String {
    match started_at.and_then(parse_timestamp) {
        Some(start) => format_duration(completed_at - start),
        None => UNKNOWN_DURATION.to_string(),
    }
}
