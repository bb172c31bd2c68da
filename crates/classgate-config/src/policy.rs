//! Validated policy structures

use crate::schema::{RawApiConfig, RawConfig, RawReminderConfig, RawWindowConfig};
use std::time::Duration;

/// Default minutes before the start at which joining opens
pub const DEFAULT_JOIN_LEAD_MINUTES: u64 = 10;
/// Default minutes after the end during which joining stays open
pub const DEFAULT_JOIN_GRACE_MINUTES: u64 = 30;
/// Default countdown horizon in days
pub const DEFAULT_COUNTDOWN_HORIZON_DAYS: u64 = 7;

const DEFAULT_TIMEOUT_SECONDS: u64 = 15;
const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 30;
const DEFAULT_REMINDER_LEADS: [u64; 2] = [15, 5];

/// Validated policy ready for use by the evaluator, clients and reminders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    pub window: WindowPolicy,
    pub api: ApiConfig,
    pub reminders: ReminderPolicy,
}

impl Policy {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            window: WindowPolicy::from_raw(raw.window),
            api: ApiConfig::from_raw(raw.api),
            reminders: ReminderPolicy::from_raw(raw.reminders),
        }
    }
}

/// Join window and countdown constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPolicy {
    /// Joining opens this long before the start
    pub join_lead: chrono::Duration,
    /// Joining stays open this long after the end
    pub join_grace: chrono::Duration,
    /// No countdown for starts further away than this
    pub countdown_horizon: chrono::Duration,
}

impl WindowPolicy {
    fn from_raw(raw: RawWindowConfig) -> Self {
        Self {
            join_lead: minutes(raw.join_lead_minutes.unwrap_or(DEFAULT_JOIN_LEAD_MINUTES)),
            join_grace: minutes(raw.join_grace_minutes.unwrap_or(DEFAULT_JOIN_GRACE_MINUTES)),
            countdown_horizon: chrono::Duration::days(
                raw.countdown_horizon_days
                    .unwrap_or(DEFAULT_COUNTDOWN_HORIZON_DAYS) as i64,
            ),
        }
    }
}

impl Default for WindowPolicy {
    fn default() -> Self {
        Self::from_raw(RawWindowConfig::default())
    }
}

/// Backend API settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// None until configured here or on the command line
    pub base_url: Option<String>,
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl ApiConfig {
    fn from_raw(raw: RawApiConfig) -> Self {
        Self {
            base_url: raw.base_url,
            timeout: Duration::from_secs(raw.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)),
            poll_interval: Duration::from_secs(
                raw.poll_interval_seconds
                    .unwrap_or(DEFAULT_POLL_INTERVAL_SECONDS),
            ),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_raw(RawApiConfig::default())
    }
}

/// Reminder settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderPolicy {
    pub enabled: bool,
    /// Lead times before a start, longest first
    pub leads: Vec<chrono::Duration>,
}

impl ReminderPolicy {
    fn from_raw(raw: RawReminderConfig) -> Self {
        let mut lead_minutes = raw
            .lead_minutes
            .unwrap_or_else(|| DEFAULT_REMINDER_LEADS.to_vec());
        lead_minutes.sort_unstable_by(|a, b| b.cmp(a));
        lead_minutes.dedup();

        Self {
            enabled: raw.enabled,
            leads: lead_minutes.into_iter().map(minutes).collect(),
        }
    }
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self::from_raw(RawReminderConfig::default())
    }
}

fn minutes(m: u64) -> chrono::Duration {
    chrono::Duration::minutes(m as i64)
}
