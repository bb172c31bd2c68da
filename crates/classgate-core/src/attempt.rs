//! Mock test attempt clock

use chrono::{DateTime, Utc};
use classgate_api::{AttemptRecord, MockTestSummary, resolve_timestamp};
use serde::Serialize;
use std::time::Duration;

/// Where an attempt stands at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    NotStarted,
    InProgress,
    Expired,
    Submitted,
}

/// Deadline arithmetic for one attempt at a timed test
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptClock {
    pub started_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub duration: chrono::Duration,
}

impl AttemptClock {
    pub fn new(started_at: Option<DateTime<Utc>>, duration: chrono::Duration) -> Self {
        Self {
            started_at,
            submitted_at: None,
            duration,
        }
    }

    pub fn with_submitted(mut self, submitted_at: Option<DateTime<Utc>>) -> Self {
        self.submitted_at = submitted_at;
        self
    }

    /// Build from backend records; `None` if the test has no duration
    pub fn from_records(attempt: &AttemptRecord, test: &MockTestSummary) -> Option<Self> {
        let minutes = test.duration_minutes?;
        Some(
            Self::new(
                resolve_timestamp(attempt.started_at.as_ref()),
                chrono::Duration::minutes(i64::from(minutes)),
            )
            .with_submitted(resolve_timestamp(attempt.submitted_at.as_ref())),
        )
    }

    /// When the attempt auto-submits
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.started_at?.checked_add_signed(self.duration)
    }

    pub fn state(&self, now: DateTime<Utc>) -> AttemptState {
        if self.submitted_at.is_some() {
            return AttemptState::Submitted;
        }
        match self.deadline() {
            None if self.started_at.is_none() => AttemptState::NotStarted,
            Some(deadline) if now < deadline => AttemptState::InProgress,
            _ => AttemptState::Expired,
        }
    }

    /// Time left; the full duration before starting, zero once submitted or expired
    pub fn time_remaining(&self, now: DateTime<Utc>) -> Duration {
        match self.state(now) {
            AttemptState::NotStarted => self.duration.to_std().unwrap_or(Duration::ZERO),
            AttemptState::InProgress => self
                .deadline()
                .and_then(|deadline| deadline.signed_duration_since(now).to_std().ok())
                .unwrap_or(Duration::ZERO),
            AttemptState::Expired | AttemptState::Submitted => Duration::ZERO,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.state(now) == AttemptState::Expired
    }

    /// An attempt can be resumed while it is started, unsubmitted and on time
    pub fn can_resume(&self, now: DateTime<Utc>) -> bool {
        self.state(now) == AttemptState::InProgress
    }

    /// Timer text for the test screen, e.g. `"01:59:30"`
    pub fn timer_label(&self, now: DateTime<Utc>) -> String {
        classgate_util::format_timer(self.time_remaining(now))
    }
}
