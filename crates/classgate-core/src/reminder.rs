//! Process-local reminder timers
//!
//! Reminders live only as long as the scheduler: nothing is persisted and
//! dropping the scheduler aborts every pending timer.

use chrono::{DateTime, Utc};
use classgate_util::{ReminderId, SessionId};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::{CoreEvent, Session};

/// Capacity of the reminder event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Future reminder instants for a session: `start - lead` for each lead that
/// has not passed yet, earliest first.
///
/// Like countdowns, reminders need both ends of the window.
pub fn reminder_times(
    session: &Session,
    leads: &[chrono::Duration],
    now: DateTime<Utc>,
) -> Vec<(chrono::Duration, DateTime<Utc>)> {
    let Some((start, _)) = session.window() else {
        return Vec::new();
    };

    let mut times: Vec<_> = leads
        .iter()
        .filter_map(|lead| Some((*lead, start.checked_sub_signed(*lead)?)))
        .filter(|(_, fire_at)| *fire_at > now)
        .collect();
    times.sort_by_key(|(_, fire_at)| *fire_at);
    times.dedup_by_key(|(_, fire_at)| *fire_at);
    times
}

#[derive(Debug)]
struct ScheduledReminder {
    session_id: SessionId,
    fire_at: DateTime<Utc>,
    handle: JoinHandle<()>,
}

/// Registers reminder timers and delivers [`CoreEvent::ReminderDue`] events.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct ReminderScheduler {
    event_tx: mpsc::Sender<CoreEvent>,
    timers: HashMap<ReminderId, ScheduledReminder>,
}

impl ReminderScheduler {
    /// Create a scheduler and the receiver its events are delivered on
    pub fn new() -> (Self, mpsc::Receiver<CoreEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        (
            Self {
                event_tx,
                timers: HashMap::new(),
            },
            event_rx,
        )
    }

    /// Fire a reminder at `fire_at`, or immediately if it is already past
    pub fn schedule(
        &mut self,
        session_id: SessionId,
        fire_at: DateTime<Utc>,
        message: impl Into<String>,
    ) -> ReminderId {
        let reminder_id = ReminderId::new();
        let delay = fire_at
            .signed_duration_since(classgate_util::now())
            .to_std()
            .unwrap_or(Duration::ZERO);

        let event = CoreEvent::ReminderDue {
            reminder_id,
            session_id: session_id.clone(),
            fire_at,
            message: message.into(),
        };
        let tx = self.event_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if tx.send(event).await.is_err() {
                debug!(%reminder_id, "Reminder receiver dropped");
            }
        });

        debug!(
            %reminder_id,
            session_id = %session_id,
            delay_secs = delay.as_secs(),
            "Reminder scheduled"
        );

        self.timers.insert(
            reminder_id,
            ScheduledReminder {
                session_id,
                fire_at,
                handle,
            },
        );
        reminder_id
    }

    /// Schedule one reminder per lead time that is still ahead of `now`
    pub fn schedule_for_session(
        &mut self,
        session: &Session,
        leads: &[chrono::Duration],
        now: DateTime<Utc>,
    ) -> Vec<ReminderId> {
        reminder_times(session, leads, now)
            .into_iter()
            .map(|(lead, fire_at)| {
                let message = format!(
                    "{} starts in {}",
                    session.display_title(),
                    classgate_util::format_countdown(lead)
                );
                self.schedule(session.id.clone(), fire_at, message)
            })
            .collect()
    }

    /// Cancel one reminder; false if unknown or already fired
    pub fn cancel(&mut self, reminder_id: ReminderId) -> bool {
        match self.timers.remove(&reminder_id) {
            Some(reminder) => {
                let pending = !reminder.handle.is_finished();
                reminder.handle.abort();
                pending
            }
            None => false,
        }
    }

    /// Cancel every reminder for a session, returning how many were pending
    pub fn cancel_session(&mut self, session_id: &SessionId) -> usize {
        let ids: Vec<ReminderId> = self
            .timers
            .iter()
            .filter(|(_, r)| &r.session_id == session_id)
            .map(|(id, _)| *id)
            .collect();

        ids.into_iter().filter(|id| self.cancel(*id)).count()
    }

    /// Cancel everything
    pub fn cancel_all(&mut self) {
        let count = self.timers.len();
        for (_, reminder) in self.timers.drain() {
            reminder.handle.abort();
        }
        if count > 0 {
            info!(count, "Reminders cancelled");
        }
    }

    /// Number of reminders that have not fired yet
    pub fn pending_count(&mut self) -> usize {
        self.timers.retain(|_, r| !r.handle.is_finished());
        self.timers.len()
    }

    /// Next pending fire time, if any
    pub fn next_fire_at(&self) -> Option<DateTime<Utc>> {
        self.timers
            .values()
            .filter(|r| !r.handle.is_finished())
            .map(|r| r.fire_at)
            .min()
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        for reminder in self.timers.values() {
            reminder.handle.abort();
        }
    }
}
