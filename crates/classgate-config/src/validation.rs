//! Configuration validation

use crate::schema::RawConfig;
use std::collections::HashSet;
use std::ops::RangeInclusive;
use thiserror::Error;
use url::Url;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("{field} = {value} is out of range ({min}..={max})")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("Invalid base URL '{value}': {message}")]
    InvalidBaseUrl { value: String, message: String },

    #[error("Duplicate reminder lead: {0} minutes")]
    DuplicateReminderLead(u64),
}

pub(crate) const JOIN_LEAD_RANGE: RangeInclusive<u64> = 0..=1440;
pub(crate) const JOIN_GRACE_RANGE: RangeInclusive<u64> = 0..=1440;
pub(crate) const COUNTDOWN_HORIZON_RANGE: RangeInclusive<u64> = 1..=365;
pub(crate) const TIMEOUT_RANGE: RangeInclusive<u64> = 1..=300;
pub(crate) const POLL_INTERVAL_RANGE: RangeInclusive<u64> = 5..=3600;
pub(crate) const REMINDER_LEAD_RANGE: RangeInclusive<u64> = 1..=1440;

/// Validate a raw configuration, collecting every problem found
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let window = &config.window;
    check_range(&mut errors, "window.join_lead_minutes", window.join_lead_minutes, JOIN_LEAD_RANGE);
    check_range(&mut errors, "window.join_grace_minutes", window.join_grace_minutes, JOIN_GRACE_RANGE);
    check_range(
        &mut errors,
        "window.countdown_horizon_days",
        window.countdown_horizon_days,
        COUNTDOWN_HORIZON_RANGE,
    );

    let api = &config.api;
    check_range(&mut errors, "api.timeout_seconds", api.timeout_seconds, TIMEOUT_RANGE);
    check_range(
        &mut errors,
        "api.poll_interval_seconds",
        api.poll_interval_seconds,
        POLL_INTERVAL_RANGE,
    );
    if let Some(base_url) = &api.base_url
        && let Err(message) = parse_base_url(base_url)
    {
        errors.push(ValidationError::InvalidBaseUrl {
            value: base_url.clone(),
            message,
        });
    }

    if let Some(leads) = &config.reminders.lead_minutes {
        let mut seen = HashSet::new();
        for &lead in leads {
            check_range(&mut errors, "reminders.lead_minutes", Some(lead), REMINDER_LEAD_RANGE);
            if !seen.insert(lead) {
                errors.push(ValidationError::DuplicateReminderLead(lead));
            }
        }
    }

    errors
}

fn check_range(
    errors: &mut Vec<ValidationError>,
    field: &'static str,
    value: Option<u64>,
    range: RangeInclusive<u64>,
) {
    if let Some(value) = value
        && !range.contains(&value)
    {
        errors.push(ValidationError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        });
    }
}

/// Parse a backend base URL: absolute, http(s), with a host.
///
/// The HTTP clients build their session with this too, so a URL that
/// validates here is one they accept.
pub fn parse_base_url(s: &str) -> Result<Url, String> {
    let url = Url::parse(s).map_err(|e| e.to_string())?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.cannot_be_a_base() || url.host_str().is_none_or(str::is_empty) {
        return Err("missing host".into());
    }

    Ok(url)
}
