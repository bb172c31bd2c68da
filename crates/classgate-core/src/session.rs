//! Session domain model

use chrono::{DateTime, Utc};
use classgate_api::{SessionRecord, SessionStatus, TimestampValue};
use classgate_util::{ClassgateError, Result, SessionId};
use tracing::debug;

/// A live class session with resolved timestamps.
///
/// `start_time`/`end_time` are `None` when the backend value was missing or
/// unparseable; every evaluation treats that as "not joinable".
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub title: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub join_link: Option<String>,
    pub recording_url: Option<String>,
    pub status: SessionStatus,
}

impl Session {
    /// Create a scheduled session with the given window and no links
    pub fn new(
        id: impl Into<SessionId>,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.into(),
            title: None,
            start_time,
            end_time,
            join_link: None,
            recording_url: None,
            status: SessionStatus::Scheduled,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_join_link(mut self, link: impl Into<String>) -> Self {
        self.join_link = non_blank(Some(link.into()));
        self
    }

    pub fn with_recording(mut self, url: impl Into<String>) -> Self {
        self.recording_url = non_blank(Some(url.into()));
        self
    }

    pub fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = status;
        self
    }

    /// Both ends of the scheduled window, if both are known
    pub fn window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.start_time?, self.end_time?))
    }

    /// Title for display, falling back to the session ID
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(self.id.as_str())
    }
}

impl From<SessionRecord> for Session {
    fn from(record: SessionRecord) -> Self {
        let start_time = resolve(&record.id, "startTime", record.start_time.as_ref());
        let end_time = resolve(&record.id, "endTime", record.end_time.as_ref());

        Self {
            id: record.id,
            title: non_blank(record.title),
            start_time,
            end_time,
            join_link: non_blank(record.join_link),
            recording_url: non_blank(record.recording_url),
            status: record.status,
        }
    }
}

fn resolve(id: &SessionId, field: &str, raw: Option<&TimestampValue>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    let parsed = raw.to_datetime();
    if parsed.is_none() {
        debug!(session_id = %id, field, raw = ?raw, "Unparseable session timestamp");
    }
    parsed
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Look up a session by ID
pub fn find_session<'a>(sessions: &'a [Session], id: &SessionId) -> Result<&'a Session> {
    sessions
        .iter()
        .find(|s| &s.id == id)
        .ok_or_else(|| ClassgateError::SessionNotFound(id.clone()))
}
