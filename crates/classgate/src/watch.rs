//! The `watch` loop: poll the schedule, report window transitions, fire reminders

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use classgate_api::SessionStatus;
use classgate_client::{ApiClient, LiveScheduleClient};
use classgate_config::Policy;
use classgate_core::{
    CoreEvent, ReminderScheduler, ScheduleTracker, Session, SessionWindowEvaluator, find_session,
};
use classgate_util::{SessionId, format_local};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::commands::sort_sessions;

/// How often cached sessions are re-evaluated between polls
const EVALUATION_TICK: Duration = Duration::from_secs(5);

pub struct Watcher {
    policy: Policy,
    client: LiveScheduleClient,
    tracker: ScheduleTracker,
    reminders: ReminderScheduler,
    reminder_rx: Option<mpsc::Receiver<CoreEvent>>,
    /// Start time each session's reminders were scheduled against
    reminded_starts: HashMap<SessionId, DateTime<Utc>>,
    sessions: Vec<Session>,
}

impl Watcher {
    pub fn new(policy: Policy, api: ApiClient) -> Self {
        let (reminders, reminder_rx) = ReminderScheduler::new();
        let tracker = ScheduleTracker::new(SessionWindowEvaluator::new(policy.window));

        Self {
            policy,
            client: LiveScheduleClient::new(api),
            tracker,
            reminders,
            reminder_rx: Some(reminder_rx),
            reminded_starts: HashMap::new(),
            sessions: Vec::new(),
        }
    }

    pub async fn run(mut self) -> Result<()> {
        let mut reminder_rx = self
            .reminder_rx
            .take()
            .context("Reminder receiver already taken")?;

        // Set up signal handlers
        let mut sigterm =
            signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
        let mut sigint =
            signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;

        let mut poll_timer = tokio::time::interval(self.policy.api.poll_interval);
        poll_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut eval_timer = tokio::time::interval(EVALUATION_TICK);
        eval_timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            poll_secs = self.policy.api.poll_interval.as_secs(),
            reminders = self.policy.reminders.enabled,
            "Watching schedule"
        );

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, stopping");
                    break;
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT, stopping");
                    break;
                }

                // Fetch the schedule
                _ = poll_timer.tick() => {
                    self.refresh().await;
                }

                // Re-evaluate cached sessions
                _ = eval_timer.tick() => {
                    self.evaluate(classgate_util::now());
                }

                Some(event) = reminder_rx.recv() => {
                    self.handle_event(&event);
                }
            }
        }

        self.reminders.cancel_all();
        Ok(())
    }

    async fn refresh(&mut self) {
        match self.client.student_schedule().await {
            Ok(mut sessions) => {
                sort_sessions(&mut sessions);
                debug!(count = sessions.len(), "Schedule refreshed");
                self.sessions = sessions;

                let now = classgate_util::now();
                self.evaluate(now);
                self.sync_reminders(now);
            }
            Err(e) => {
                // Keep evaluating the last known schedule
                warn!(error = %e, cached = self.sessions.len(), "Schedule refresh failed");
            }
        }
    }

    fn evaluate(&mut self, now: DateTime<Utc>) {
        for event in self.tracker.update(&self.sessions, now) {
            self.handle_event(&event);
        }
    }

    /// Keep one set of reminders per session, rescheduled when its start moves
    fn sync_reminders(&mut self, now: DateTime<Utc>) {
        if !self.policy.reminders.enabled {
            return;
        }

        let mut seen = HashSet::new();
        for session in &self.sessions {
            seen.insert(session.id.clone());

            let start = match session.window() {
                Some((start, _)) if session.status != SessionStatus::Cancelled => start,
                _ => {
                    if self.reminded_starts.remove(&session.id).is_some() {
                        self.reminders.cancel_session(&session.id);
                    }
                    continue;
                }
            };

            if self.reminded_starts.get(&session.id) == Some(&start) {
                continue;
            }

            self.reminders.cancel_session(&session.id);
            let ids =
                self.reminders
                    .schedule_for_session(session, &self.policy.reminders.leads, now);
            self.reminded_starts.insert(session.id.clone(), start);

            if !ids.is_empty() {
                debug!(session_id = %session.id, count = ids.len(), "Reminders scheduled");
            }
        }

        let gone: Vec<SessionId> = self
            .reminded_starts
            .keys()
            .filter(|id| !seen.contains(*id))
            .cloned()
            .collect();
        for id in gone {
            self.reminded_starts.remove(&id);
            self.reminders.cancel_session(&id);
        }

        if let Some(next) = self.reminders.next_fire_at() {
            debug!(
                next_reminder = %format_local(&next),
                pending = self.reminders.pending_count(),
                "Reminders in sync"
            );
        }
    }

    fn title_of(&self, id: &SessionId) -> String {
        find_session(&self.sessions, id)
            .map(|s| s.display_title().to_string())
            .unwrap_or_else(|_| id.to_string())
    }

    fn handle_event(&self, event: &CoreEvent) {
        let stamp = format_local(&classgate_util::now());
        let title = self.title_of(event.session_id());

        match event {
            CoreEvent::JoinWindowOpened { session_id, join_link } => {
                info!(session_id = %session_id, has_link = join_link.is_some(), "Join window opened");
                match join_link {
                    Some(link) => println!("[{}] {}: you can join now at {}", stamp, title, link),
                    None => println!("[{}] {}: join window open, link not posted yet", stamp, title),
                }
            }
            CoreEvent::SessionStarted { session_id } => {
                info!(session_id = %session_id, "Session started");
                println!("[{}] {}: live now", stamp, title);
            }
            CoreEvent::SessionEnded { session_id } => {
                info!(session_id = %session_id, "Session ended");
                println!("[{}] {}: ended", stamp, title);
            }
            CoreEvent::JoinWindowClosed { session_id, recording_url } => {
                info!(session_id = %session_id, "Join window closed");
                if let Some(url) = recording_url {
                    println!("[{}] {}: recording at {}", stamp, title, url);
                }
            }
            CoreEvent::ReminderDue {
                reminder_id,
                session_id,
                fire_at,
                message,
            } => {
                info!(
                    %reminder_id,
                    session_id = %session_id,
                    fire_at = %fire_at,
                    "Reminder due"
                );
                println!("[{}] Reminder: {}", stamp, message);
            }
        }
    }
}
