//! Provider timestamp parsing and local-zone conversion
//!
//! The time-tracking provider reports event times as ISO-8601-like UTC
//! strings with an optional fractional-second suffix and a trailing `Z`
//! (e.g. `2024-01-01T08:00:00.1234567Z`). Attendance records store local
//! wall-clock time in a single configured named zone, truncated to whole
//! seconds so the value doubles as part of the dedup key.

use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Fixed wall-clock format accepted from the provider (after stripping
/// the fractional suffix and zone marker).
const PROVIDER_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Storage format for local timestamps (second precision)
pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp parsing errors
#[derive(Debug, Error)]
pub enum TimestampError {
    /// Input did not match the provider's fixed format
    #[error("Malformed provider timestamp: {0}")]
    Malformed(String),
}

/// Parse a provider timestamp string into an absolute UTC instant.
///
/// Strips the fractional-second suffix (everything after the first `.`)
/// and the trailing `Z`, then parses the remainder as UTC wall-clock.
/// Any other deviation from the fixed format fails; callers treat a
/// failure as skip-this-event, not as a run-fatal error.
pub fn parse_provider_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let stripped = raw
        .split('.')
        .next()
        .unwrap_or(raw)
        .trim_end_matches('Z');

    let naive = NaiveDateTime::parse_from_str(stripped, PROVIDER_FORMAT)
        .map_err(|_| TimestampError::Malformed(raw.to_string()))?;

    Ok(Utc.from_utc_datetime(&naive))
}

/// Convert a UTC instant to local wall-clock time in the given zone,
/// truncated to whole seconds.
pub fn to_local(instant: DateTime<Utc>, tz: Tz) -> NaiveDateTime {
    let local = instant.with_timezone(&tz).naive_local();
    // Sub-second precision never reaches storage or the dedup key
    local.with_nanosecond(0).unwrap_or(local)
}

/// Format a local timestamp for storage and dedup-key comparison
pub fn local_time_string(local: NaiveDateTime) -> String {
    local.format(LOCAL_TIME_FORMAT).to_string()
}

/// Elapsed working hours between two instants (fractional, >= 0)
pub fn working_hours_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let seconds = (end - start).num_milliseconds() as f64 / 1000.0;
    (seconds / 3600.0).max(0.0)
}
