//! One-shot subcommands

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use classgate_api::{EvaluationResult, MockTestCategory};
use classgate_client::{ApiClient, CourseCatalogClient, LiveScheduleClient, MockTestClient};
use classgate_config::Policy;
use classgate_core::{AttemptClock, AttemptState, Session, SessionAction, SessionWindowEvaluator};
use classgate_util::{MockTestId, SessionId, format_local, format_timer};
use serde::Serialize;
use tracing::{info, warn};

/// Raw `evaluate` arguments
pub struct EvaluateInput<'a> {
    pub start: Option<&'a str>,
    pub end: Option<&'a str>,
    pub now: Option<&'a str>,
    pub join_link: Option<&'a str>,
    pub recording_url: Option<&'a str>,
}

/// One session as printed by `evaluate --json` and `schedule --json`
#[derive(Debug, Serialize)]
struct SessionView<'a> {
    id: &'a SessionId,
    title: &'a str,
    start_time: Option<DateTime<Utc>>,
    end_time: Option<DateTime<Utc>>,
    #[serde(flatten)]
    evaluation: EvaluationResult,
    #[serde(flatten)]
    action: SessionAction,
}

impl<'a> SessionView<'a> {
    fn new(evaluator: &SessionWindowEvaluator, session: &'a Session, now: DateTime<Utc>) -> Self {
        Self {
            id: &session.id,
            title: session.display_title(),
            start_time: session.start_time,
            end_time: session.end_time,
            evaluation: evaluator.evaluate(session, now),
            action: evaluator.action(session, now),
        }
    }

    fn print(&self) {
        let when = match self.start_time {
            Some(start) => format_local(&start),
            None => "unscheduled".to_string(),
        };
        let live = if self.evaluation.is_live { " [LIVE]" } else { "" };
        println!("{:<16}  {}{}", when, self.title, live);

        match &self.action {
            SessionAction::Join { url } | SessionAction::WatchRecording { url } => {
                println!("{:<16}  {}: {}", "", self.action.label(), url)
            }
            action => println!("{:<16}  {}", "", action.label()),
        }
    }
}

/// Lenient like the backend fields: an unparseable window bound becomes absent
fn window_bound(name: &str, raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    let parsed = classgate_util::parse_timestamp(raw);
    if parsed.is_none() {
        warn!(field = name, value = raw, "Unparseable timestamp, treating as absent");
    }
    parsed
}

pub fn evaluate(policy: &Policy, input: EvaluateInput<'_>, json: bool) -> Result<()> {
    let now = match input.now {
        Some(raw) => classgate_util::parse_timestamp_strict(raw)
            .with_context(|| format!("Invalid --now value {:?}", raw))?,
        None => classgate_util::now(),
    };

    let mut session = Session::new(
        "cli",
        window_bound("start", input.start),
        window_bound("end", input.end),
    );
    if let Some(link) = input.join_link {
        session = session.with_join_link(link);
    }
    if let Some(url) = input.recording_url {
        session = session.with_recording(url);
    }

    let evaluator = SessionWindowEvaluator::new(policy.window);
    let view = SessionView::new(&evaluator, &session, now);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("now:        {}", format_local(&now));
    println!("live:       {}", yes_no(view.evaluation.is_live));
    println!("can join:   {}", yes_no(view.evaluation.can_join));
    println!(
        "countdown:  {}",
        view.evaluation.countdown_label.as_deref().unwrap_or("-")
    );
    println!("action:     {}", view.action.label());
    Ok(())
}

pub async fn schedule(policy: &Policy, api: ApiClient, all: bool, json: bool) -> Result<()> {
    let client = LiveScheduleClient::new(api);
    let mut sessions = client
        .student_schedule()
        .await
        .context("Failed to fetch student schedule")?;
    if all {
        sessions.extend(
            client
                .live_classes()
                .await
                .context("Failed to fetch live classes")?,
        );
    }
    sort_sessions(&mut sessions);

    let now = classgate_util::now();
    let evaluator = SessionWindowEvaluator::new(policy.window);
    let views: Vec<SessionView<'_>> = sessions
        .iter()
        .map(|s| SessionView::new(&evaluator, s, now))
        .collect();

    info!(count = views.len(), "Schedule evaluated");

    if json {
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if views.is_empty() {
        println!("No live classes scheduled.");
    }
    for view in &views {
        view.print();
    }
    Ok(())
}

/// Earliest start first; unscheduled sessions last
pub fn sort_sessions(sessions: &mut [Session]) {
    sessions.sort_by_key(|s| (s.start_time.is_none(), s.start_time));
}

pub async fn courses(api: ApiClient, mine: bool, json: bool) -> Result<()> {
    let client = CourseCatalogClient::new(api);
    let courses = if mine {
        client.my_courses().await.context("Failed to fetch enrolled courses")?
    } else {
        client
            .available_courses()
            .await
            .context("Failed to fetch courses")?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&courses)?);
        return Ok(());
    }

    for course in &courses {
        match course.price {
            Some(price) if price > 0.0 => println!("{}  ({:.2})", course.title, price),
            _ => println!("{}", course.title),
        }
    }
    Ok(())
}

pub async fn mock_test_tree(api: ApiClient, json: bool) -> Result<()> {
    let tree = MockTestClient::new(api)
        .test_tree()
        .await
        .context("Failed to fetch mock test tree")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    for category in &tree {
        print_category(category, 0);
    }
    Ok(())
}

fn print_category(category: &MockTestCategory, depth: usize) {
    let indent = "  ".repeat(depth);
    println!("{}{} ({} tests)", indent, category.name, category.test_count());
    for test in &category.tests {
        let free = if test.is_free { " [free]" } else { "" };
        println!("{}  - {} [{}]{}", indent, test.title, test.id, free);
    }
    for child in &category.children {
        print_category(child, depth + 1);
    }
}

#[derive(Debug, Serialize)]
struct AttemptView {
    id: String,
    state: AttemptState,
    can_resume: bool,
    remaining_secs: u64,
    score: Option<f64>,
}

pub async fn mock_test(api: ApiClient, id: &str, json: bool) -> Result<()> {
    let client = MockTestClient::new(api);
    let id = MockTestId::new(id);
    let details = client
        .test_details(&id)
        .await
        .with_context(|| format!("Failed to fetch mock test {}", id))?;
    let attempts = client
        .attempts(&id)
        .await
        .with_context(|| format!("Failed to fetch attempts for {}", id))?;

    let now = classgate_util::now();
    let views: Vec<AttemptView> = attempts
        .iter()
        .filter_map(|attempt| {
            let clock = AttemptClock::from_records(attempt, &details.summary)?;
            Some(AttemptView {
                id: attempt.id.clone(),
                state: clock.state(now),
                can_resume: clock.can_resume(now),
                remaining_secs: clock.time_remaining(now).as_secs(),
                score: attempt.score,
            })
        })
        .collect();

    if json {
        let out = serde_json::json!({ "test": details, "attempts": views });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", details.summary.title);
    if let Some(minutes) = details.summary.duration_minutes {
        println!("  Duration: {} min", minutes);
    }
    if let Some(questions) = details.summary.total_questions {
        println!("  Questions: {}", questions);
    }
    for section in &details.sections {
        match section.duration_minutes {
            Some(minutes) => println!("  Section {}: {} min", section.name, minutes),
            None => println!("  Section {}", section.name),
        }
    }
    if views.is_empty() {
        println!("  No attempts yet.");
    }
    for view in &views {
        let remaining = format_timer(std::time::Duration::from_secs(view.remaining_secs));
        match (view.state, view.score) {
            (AttemptState::InProgress, _) => {
                println!("  Attempt {}: in progress, {} left", view.id, remaining)
            }
            (AttemptState::Submitted, Some(score)) => {
                println!("  Attempt {}: submitted, score {}", view.id, score)
            }
            (state, _) => println!("  Attempt {}: {:?}", view.id, state),
        }
    }
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
