//! Integration tests for classgate
//!
//! These tests run backend JSON through config, domain conversion and the
//! evaluator the same way the CLI does.

use chrono::{DateTime, Duration, TimeZone, Utc};
use classgate_api::{EvaluationResult, ListEnvelope, SessionRecord};
use classgate_config::{Policy, load_config_or_default, parse_config};
use classgate_core::{
    CoreEvent, ReminderScheduler, ScheduleTracker, Session, SessionAction,
    SessionWindowEvaluator, reminder_times,
};
use std::io::Write;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap()
}

fn iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn session_from_json(json: &str) -> Session {
    let record: SessionRecord = serde_json::from_str(json).unwrap();
    Session::from(record)
}

fn backend_session(start: DateTime<Utc>, end: DateTime<Utc>) -> Session {
    session_from_json(&format!(
        r#"{{"_id": "s1", "startTime": "{}", "endTime": "{}", "joinLink": "https://meet.example.com/s1", "status": "scheduled"}}"#,
        iso(start),
        iso(end)
    ))
}

#[test]
fn scenario_upcoming() {
    let session = backend_session(t0() + Duration::hours(2), t0() + Duration::hours(3));
    let result = classgate_core::evaluate(&session, t0());

    assert_eq!(
        result,
        EvaluationResult {
            is_live: false,
            can_join: false,
            countdown_label: Some("2h 0m".into()),
        }
    );
}

#[test]
fn scenario_live() {
    let session = backend_session(t0(), t0() + Duration::hours(1));
    let result = classgate_core::evaluate(&session, t0() + Duration::minutes(5));

    assert!(result.is_live);
    assert!(result.can_join);
    assert_eq!(result.countdown_label, None);
}

#[test]
fn scenario_grace_period() {
    let session = backend_session(t0(), t0() + Duration::hours(1));
    let now = t0() + Duration::hours(1) + Duration::minutes(20);

    assert!(!classgate_core::is_live(&session, now));
    assert!(classgate_core::can_join(&session, now));
}

#[test]
fn scenario_null_start() {
    let session = session_from_json(
        r#"{"_id": "s1", "startTime": null, "endTime": "2025-03-01T11:00:00Z"}"#,
    );

    for hours in [-48, -1, 0, 1, 48] {
        let now = t0() + Duration::hours(hours);
        assert_eq!(classgate_core::evaluate(&session, now), EvaluationResult::default());
    }
}

#[test]
fn garbage_and_numeric_timestamps() {
    let garbage = session_from_json(
        r#"{"_id": "g", "startTime": "not a date", "endTime": {"$date": 1}}"#,
    );
    assert_eq!(garbage.window(), None);
    assert_eq!(
        SessionWindowEvaluator::default().action(&garbage, t0()),
        SessionAction::Unscheduled
    );

    let numeric = session_from_json(&format!(
        r#"{{"_id": "n", "startTime": {}, "endTime": "{}"}}"#,
        t0().timestamp_millis(),
        iso(t0() + Duration::hours(1))
    ));
    assert_eq!(numeric.start_time, Some(t0()));
    assert!(classgate_core::is_live(&numeric, t0() + Duration::minutes(1)));
}

#[test]
fn end_time_at_the_clock_limit_stays_joinable() {
    let session = session_from_json(&format!(
        r#"{{"_id": "far", "startTime": {}, "endTime": 8210266876799999}}"#,
        t0().timestamp_millis()
    ));
    assert!(session.end_time.is_some());

    for now in [t0(), t0() + Duration::hours(1), t0() + Duration::days(365)] {
        let result = classgate_core::evaluate(&session, now);
        assert!(result.is_live);
        assert!(result.can_join, "live but not joinable at {}", now);
    }
}

#[test]
fn cancelled_session_is_silent_in_watch_events() {
    let session = session_from_json(&format!(
        r#"{{"_id": "off", "startTime": "{}", "endTime": "{}", "joinLink": "https://meet.example.com/x", "status": "cancelled"}}"#,
        iso(t0()),
        iso(t0() + Duration::hours(1))
    ));
    let mut tracker = ScheduleTracker::default();

    assert!(tracker.update(std::slice::from_ref(&session), t0() + Duration::minutes(5)).is_empty());
    assert_eq!(
        SessionWindowEvaluator::default().action(&session, t0() + Duration::minutes(5)),
        SessionAction::Cancelled
    );
}

#[test]
fn configured_window_changes_evaluation() {
    let policy = parse_config(
        r#"
        config_version = 1

        [window]
        join_lead_minutes = 0
        join_grace_minutes = 0
        countdown_horizon_days = 1
        "#,
    )
    .unwrap();

    let evaluator = SessionWindowEvaluator::new(policy.window);
    let session = backend_session(t0(), t0() + Duration::hours(1));

    assert!(!evaluator.can_join(&session, t0() - Duration::minutes(5)));
    assert!(evaluator.can_join(&session, t0()));
    assert!(!evaluator.can_join(&session, t0() + Duration::minutes(61)));
    assert_eq!(evaluator.countdown_label(&session, t0() - Duration::days(2)), None);
    assert_eq!(
        evaluator.countdown_label(&session, t0() - Duration::hours(20)).as_deref(),
        Some("20h 0m")
    );
}

#[test]
fn missing_config_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let policy = load_config_or_default(dir.path().join("config.toml")).unwrap();
    assert_eq!(policy, Policy::default());

    let path = dir.path().join("custom.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "config_version = 1\n[api]\nbase_url = \"https://api.example.com\"").unwrap();

    let policy = load_config_or_default(&path).unwrap();
    assert_eq!(policy.api.base_url.as_deref(), Some("https://api.example.com"));
    assert_eq!(policy.window, Policy::default().window);
}

#[test]
fn schedule_actions_from_wrapped_response() {
    let json = format!(
        r#"{{"success": true, "data": [
            {{"_id": "live", "startTime": "{live_start}", "endTime": "{live_end}", "joinLink": "https://meet.example.com/live"}},
            {{"_id": "nolink", "startTime": "{live_start}", "endTime": "{live_end}", "joinLink": ""}},
            {{"_id": "past", "startTime": "{past_start}", "endTime": "{past_end}", "recordingUrl": "https://video.example.com/past"}},
            {{"_id": "soon", "startTime": "{soon_start}", "endTime": "{soon_end}"}},
            {{"_id": "off", "startTime": "{soon_start}", "endTime": "{soon_end}", "status": "cancelled"}}
        ]}}"#,
        live_start = iso(t0() - Duration::minutes(10)),
        live_end = iso(t0() + Duration::minutes(50)),
        past_start = iso(t0() - Duration::days(1)),
        past_end = iso(t0() - Duration::days(1) + Duration::hours(1)),
        soon_start = iso(t0() + Duration::hours(3)),
        soon_end = iso(t0() + Duration::hours(4)),
    );

    let records: ListEnvelope<SessionRecord> = serde_json::from_str(&json).unwrap();
    let sessions: Vec<Session> = records.into_vec().into_iter().map(Session::from).collect();
    let evaluator = SessionWindowEvaluator::default();

    let actions: Vec<SessionAction> = sessions.iter().map(|s| evaluator.action(s, t0())).collect();
    assert_eq!(
        actions,
        vec![
            SessionAction::Join {
                url: "https://meet.example.com/live".into()
            },
            SessionAction::AwaitingLink,
            SessionAction::WatchRecording {
                url: "https://video.example.com/past".into()
            },
            SessionAction::Upcoming {
                countdown: Some("3h 0m".into())
            },
            SessionAction::Cancelled,
        ]
    );
}

#[test]
fn tracker_reports_transitions_across_polls() {
    let session = backend_session(t0(), t0() + Duration::hours(1));
    let mut tracker = ScheduleTracker::default();
    let sessions = vec![session];

    let mut seen = Vec::new();
    for minute in (-30..=120).step_by(5) {
        seen.extend(tracker.update(&sessions, t0() + Duration::minutes(minute)));
    }

    let kinds: Vec<&str> = seen
        .iter()
        .map(|e| match e {
            CoreEvent::JoinWindowOpened { .. } => "opened",
            CoreEvent::SessionStarted { .. } => "started",
            CoreEvent::SessionEnded { .. } => "ended",
            CoreEvent::JoinWindowClosed { .. } => "closed",
            CoreEvent::ReminderDue { .. } => "reminder",
        })
        .collect();
    assert_eq!(kinds, vec!["opened", "started", "ended", "closed"]);
}

#[test]
fn default_reminders_before_start() {
    let policy = Policy::default();
    let session = backend_session(t0(), t0() + Duration::hours(1));

    let times: Vec<DateTime<Utc>> = reminder_times(&session, &policy.reminders.leads, t0() - Duration::hours(1))
        .into_iter()
        .map(|(_, at)| at)
        .collect();
    assert_eq!(
        times,
        vec![t0() - Duration::minutes(15), t0() - Duration::minutes(5)]
    );
}

#[tokio::test]
async fn reminder_for_imminent_session_fires() {
    let now = classgate_util::now();
    let session = Session::new("soon", Some(now + Duration::seconds(1)), Some(now + Duration::hours(1)))
        .with_title("Verbal Live");

    let (mut scheduler, mut rx) = ReminderScheduler::new();
    // A lead just under a second puts the reminder a few milliseconds out
    let ids = scheduler.schedule_for_session(&session, &[Duration::milliseconds(950)], now);
    assert_eq!(ids.len(), 1);

    let event = tokio::time::timeout(std::time::Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    match event {
        CoreEvent::ReminderDue { message, .. } => assert_eq!(message, "Verbal Live starts in 0m"),
        other => panic!("unexpected event {:?}", other),
    }
}
