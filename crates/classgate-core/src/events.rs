//! Core events emitted by the tracker and the reminder scheduler

use chrono::{DateTime, Utc};
use classgate_util::{ReminderId, SessionId};

/// Events emitted by the core
#[derive(Debug, Clone, PartialEq)]
pub enum CoreEvent {
    /// The join window opened (or was already open when first seen)
    JoinWindowOpened {
        session_id: SessionId,
        join_link: Option<String>,
    },

    /// The scheduled start was reached
    SessionStarted { session_id: SessionId },

    /// The scheduled end passed
    SessionEnded { session_id: SessionId },

    /// The grace period after the end ran out
    JoinWindowClosed {
        session_id: SessionId,
        recording_url: Option<String>,
    },

    /// A registered reminder fired
    ReminderDue {
        reminder_id: ReminderId,
        session_id: SessionId,
        fire_at: DateTime<Utc>,
        message: String,
    },
}

impl CoreEvent {
    pub fn session_id(&self) -> &SessionId {
        match self {
            CoreEvent::JoinWindowOpened { session_id, .. }
            | CoreEvent::SessionStarted { session_id }
            | CoreEvent::SessionEnded { session_id }
            | CoreEvent::JoinWindowClosed { session_id, .. }
            | CoreEvent::ReminderDue { session_id, .. } => session_id,
        }
    }
}
