//! What a student can do with a session right now

use chrono::{DateTime, Utc};
use classgate_api::SessionStatus;
use serde::Serialize;

use crate::{Session, SessionWindowEvaluator};

/// The primary action offered for a session at a given instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionAction {
    /// Start or end time missing or unparseable
    Unscheduled,
    /// Cancelled by the backend
    Cancelled,
    /// Join window not open yet
    Upcoming { countdown: Option<String> },
    /// Join window open but the host has not set a link yet
    AwaitingLink,
    /// Join window open and a link is available
    Join { url: String },
    /// Join window closed and a recording is attached
    WatchRecording { url: String },
    /// Join window closed, nothing to watch
    Ended,
}

impl SessionAction {
    /// Short label for buttons and listings
    pub fn label(&self) -> String {
        match self {
            SessionAction::Unscheduled => "Not scheduled".into(),
            SessionAction::Cancelled => "Cancelled".into(),
            SessionAction::Upcoming {
                countdown: Some(countdown),
            } => format!("Starts in {}", countdown),
            SessionAction::Upcoming { countdown: None } => "Upcoming".into(),
            SessionAction::AwaitingLink => "Link not available yet".into(),
            SessionAction::Join { .. } => "Join now".into(),
            SessionAction::WatchRecording { .. } => "Watch recording".into(),
            SessionAction::Ended => "Ended".into(),
        }
    }
}

impl SessionWindowEvaluator {
    /// Combine the join window with link, recording and status.
    ///
    /// A cancelled status always wins; otherwise the backend status is
    /// ignored in favor of the timestamps.
    pub fn action(&self, session: &Session, now: DateTime<Utc>) -> SessionAction {
        if session.status == SessionStatus::Cancelled {
            return SessionAction::Cancelled;
        }

        let Some((opens, _)) = self.join_window(session) else {
            return SessionAction::Unscheduled;
        };

        if self.can_join(session, now) {
            return match &session.join_link {
                Some(url) => SessionAction::Join { url: url.clone() },
                None => SessionAction::AwaitingLink,
            };
        }

        if now < opens {
            return SessionAction::Upcoming {
                countdown: self.countdown_label(session, now),
            };
        }

        match &session.recording_url {
            Some(url) => SessionAction::WatchRecording { url: url.clone() },
            None => SessionAction::Ended,
        }
    }
}
