//! Live class schedule client

use classgate_api::{ListEnvelope, SessionRecord};
use classgate_core::Session;
use tracing::debug;

use crate::{ApiClient, ClientResult};

/// Fetches upcoming and past live class sessions
#[derive(Debug, Clone)]
pub struct LiveScheduleClient {
    api: ApiClient,
}

impl LiveScheduleClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// `GET /api/live-batches/student/schedule`: sessions of the student's batches
    pub async fn student_schedule(&self) -> ClientResult<Vec<Session>> {
        self.fetch_sessions(&["api", "live-batches", "student", "schedule"])
            .await
    }

    /// `GET /api/live-classes`: standalone live classes
    pub async fn live_classes(&self) -> ClientResult<Vec<Session>> {
        self.fetch_sessions(&["api", "live-classes"]).await
    }

    async fn fetch_sessions(&self, segments: &[&str]) -> ClientResult<Vec<Session>> {
        let records: ListEnvelope<SessionRecord> = self.api.get_json(segments).await?;
        let sessions: Vec<Session> = records.into_vec().into_iter().map(Session::from).collect();

        let unscheduled = sessions.iter().filter(|s| s.window().is_none()).count();
        debug!(count = sessions.len(), unscheduled, "Fetched sessions");

        Ok(sessions)
    }
}
