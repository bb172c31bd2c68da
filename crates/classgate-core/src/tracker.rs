//! Schedule tracking
//!
//! The evaluator is stateless; the tracker remembers the previous evaluation
//! of each session so a polling loop can react to windows opening and closing.

use chrono::{DateTime, Utc};
use classgate_api::{EvaluationResult, SessionStatus};
use classgate_util::SessionId;
use std::collections::HashMap;
use tracing::debug;

use crate::{CoreEvent, Session, SessionWindowEvaluator};

/// Turns successive evaluations of a schedule into transition events
#[derive(Debug, Default)]
pub struct ScheduleTracker {
    evaluator: SessionWindowEvaluator,
    last: HashMap<SessionId, EvaluationResult>,
}

impl ScheduleTracker {
    pub fn new(evaluator: SessionWindowEvaluator) -> Self {
        Self {
            evaluator,
            last: HashMap::new(),
        }
    }

    /// Number of sessions currently tracked
    pub fn tracked(&self) -> usize {
        self.last.len()
    }

    /// Re-evaluate the schedule and report what changed since the last call.
    ///
    /// A session seen for the first time only reports what is currently true
    /// (open window, live). Cancelled sessions evaluate as closed, so a
    /// cancellation mid-window reports the window closing. Sessions missing
    /// from `sessions` are forgotten.
    pub fn update(&mut self, sessions: &[Session], now: DateTime<Utc>) -> Vec<CoreEvent> {
        let mut events = Vec::new();
        let mut next = HashMap::with_capacity(sessions.len());

        for session in sessions {
            let current = if session.status == SessionStatus::Cancelled {
                EvaluationResult::default()
            } else {
                self.evaluator.evaluate(session, now)
            };
            let previous = self.last.get(&session.id).cloned().unwrap_or_default();

            if current.can_join && !previous.can_join {
                events.push(CoreEvent::JoinWindowOpened {
                    session_id: session.id.clone(),
                    join_link: session.join_link.clone(),
                });
            }
            if current.is_live && !previous.is_live {
                events.push(CoreEvent::SessionStarted {
                    session_id: session.id.clone(),
                });
            }
            if previous.is_live && !current.is_live {
                events.push(CoreEvent::SessionEnded {
                    session_id: session.id.clone(),
                });
            }
            if previous.can_join && !current.can_join {
                events.push(CoreEvent::JoinWindowClosed {
                    session_id: session.id.clone(),
                    recording_url: session.recording_url.clone(),
                });
            }

            next.insert(session.id.clone(), current);
        }

        let dropped = self.last.keys().filter(|id| !next.contains_key(*id)).count();
        if dropped > 0 {
            debug!(dropped, "Sessions left the schedule");
        }
        self.last = next;

        events
    }
}
