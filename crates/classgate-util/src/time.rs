//! Time utilities for classgate
//!
//! Provides the wall clock used for every window evaluation, lenient parsing
//! of backend timestamps, and the countdown/timer label formats.
//!
//! # Mock Time for Development
//!
//! In debug builds, the `CLASSGATE_MOCK_TIME` environment variable can be set
//! to override the system time for all time-sensitive operations. This is useful
//! for checking join windows and countdowns against a fixed schedule.
//!
//! Format: `YYYY-MM-DD HH:MM:SS` in local time (e.g., `2025-12-25 14:30:00`)
//!
//! Example:
//! ```bash
//! CLASSGATE_MOCK_TIME="2025-12-25 14:30:00" classgate schedule
//! ```

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::sync::OnceLock;
use std::time::Duration;

use crate::{ClassgateError, Result};

/// Environment variable name for mock time (debug builds only)
pub const MOCK_TIME_ENV_VAR: &str = "CLASSGATE_MOCK_TIME";

const MOCK_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Offset between mock time and real time, computed once at first use so that
/// mock time keeps advancing.
static MOCK_TIME_OFFSET: OnceLock<Option<chrono::Duration>> = OnceLock::new();

#[allow(clippy::disallowed_methods)] // This is the internal implementation that wraps Utc::now()
fn get_mock_time_offset() -> Option<chrono::Duration> {
    *MOCK_TIME_OFFSET.get_or_init(|| {
        #[cfg(debug_assertions)]
        {
            if let Ok(mock_time_str) = std::env::var(MOCK_TIME_ENV_VAR) {
                match NaiveDateTime::parse_from_str(&mock_time_str, MOCK_TIME_FORMAT) {
                    Ok(naive_dt) => match Local.from_local_datetime(&naive_dt).single() {
                        Some(mock_dt) => {
                            let offset = mock_dt.with_timezone(&Utc).signed_duration_since(Utc::now());
                            tracing::info!(
                                mock_time = %mock_time_str,
                                offset_secs = offset.num_seconds(),
                                "Mock time enabled"
                            );
                            return Some(offset);
                        }
                        None => {
                            tracing::warn!(
                                mock_time = %mock_time_str,
                                "Failed to convert mock time to local timezone"
                            );
                        }
                    },
                    Err(_) => {
                        tracing::warn!(
                            mock_time = %mock_time_str,
                            expected_format = MOCK_TIME_FORMAT,
                            "Invalid mock time format"
                        );
                    }
                }
            }
            None
        }
        #[cfg(not(debug_assertions))]
        {
            None
        }
    })
}

/// Returns whether mock time is currently active.
pub fn is_mock_time_active() -> bool {
    get_mock_time_offset().is_some()
}

/// Get the current time, respecting mock time settings in debug builds.
#[allow(clippy::disallowed_methods)] // This is the wrapper that provides mock time support
pub fn now() -> DateTime<Utc> {
    let real_now = Utc::now();

    match get_mock_time_offset() {
        Some(offset) => real_now + offset,
        None => real_now,
    }
}

/// Parse a backend timestamp, returning `None` for anything unparseable.
///
/// Accepted forms:
/// - RFC 3339 (`2025-03-01T10:00:00.000Z`, `2025-03-01T15:30:00+05:30`)
/// - ISO date-time with a `+hhmm` offset
/// - ISO date-time without offset, taken as local time
/// - `YYYY-MM-DD`, taken as midnight UTC
/// - epoch milliseconds as a digit string
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }

    if s.bytes().all(|b| b.is_ascii_digit())
        && let Ok(millis) = s.parse::<i64>()
    {
        return from_epoch_millis(millis);
    }

    None
}

/// Like [`parse_timestamp`], but reports the rejected input.
pub fn parse_timestamp_strict(raw: &str) -> Result<DateTime<Utc>> {
    parse_timestamp(raw).ok_or_else(|| ClassgateError::invalid_timestamp(raw))
}

/// Convert epoch milliseconds to a UTC timestamp
pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

/// Format the time left until a start as a countdown label.
///
/// Components are floor-truncated and never negative:
/// `"2d 5h"` at a day or more, `"3h 20m"` at an hour or more, otherwise `"45m"`.
pub fn format_countdown(diff: chrono::Duration) -> String {
    let total_secs = diff.num_seconds().max(0);
    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3600;
    let minutes = (total_secs % 3600) / 60;

    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Format a duration as a test timer, HH:MM:SS or MM:SS
pub fn format_timer(d: Duration) -> String {
    let secs = d.as_secs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Format a timestamp in local time for display
pub fn format_local(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}
