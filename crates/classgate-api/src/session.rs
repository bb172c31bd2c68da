//! Live class session records and evaluation results

use classgate_util::SessionId;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{TimestampValue, lenient_timestamp};

/// Backend session status.
///
/// Informational only: the join window is always derived from timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    Live,
    Completed,
    Cancelled,
}

impl SessionStatus {
    /// Map a backend status string, treating unknown values as scheduled
    pub fn from_backend(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "live" | "ongoing" => SessionStatus::Live,
            "completed" | "ended" => SessionStatus::Completed,
            "cancelled" | "canceled" => SessionStatus::Cancelled,
            _ => SessionStatus::Scheduled,
        }
    }
}

impl<'de> Deserialize<'de> for SessionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Self::from_backend).unwrap_or_default())
    }
}

/// A live class session as returned by the schedule endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(rename = "_id", alias = "id")]
    pub id: SessionId,

    #[serde(default, alias = "topic")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub start_time: Option<TimestampValue>,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub end_time: Option<TimestampValue>,

    #[serde(default)]
    pub join_link: Option<String>,

    #[serde(default)]
    pub recording_url: Option<String>,

    #[serde(default)]
    pub status: SessionStatus,
}

/// Presentation state derived for one session at one instant.
///
/// Recomputed on every tick and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub is_live: bool,
    pub can_join: bool,
    pub countdown_label: Option<String>,
}
