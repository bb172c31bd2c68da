//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Join window and countdown constants
    #[serde(default)]
    pub window: RawWindowConfig,

    /// Backend API settings
    #[serde(default)]
    pub api: RawApiConfig,

    /// In-session reminder settings
    #[serde(default)]
    pub reminders: RawReminderConfig,
}

/// Join window constants, all optional
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawWindowConfig {
    /// Minutes before the start at which joining opens (default: 10)
    pub join_lead_minutes: Option<u64>,

    /// Minutes after the end during which joining stays open (default: 30)
    pub join_grace_minutes: Option<u64>,

    /// Countdowns are only shown for starts at most this many days away (default: 7)
    pub countdown_horizon_days: Option<u64>,
}

/// Backend API settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawApiConfig {
    /// Base URL of the REST backend, e.g. "https://api.example.com"
    pub base_url: Option<String>,

    /// Per-request timeout in seconds (default: 15)
    pub timeout_seconds: Option<u64>,

    /// Schedule refresh interval in seconds for `watch` (default: 30)
    pub poll_interval_seconds: Option<u64>,
}

/// Reminder settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawReminderConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Minutes before a session start at which to remind (default: [15, 5])
    pub lead_minutes: Option<Vec<u64>>,
}

impl Default for RawReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            lead_minutes: None,
        }
    }
}

fn default_true() -> bool {
    true
}
