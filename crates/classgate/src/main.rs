//! classgate - live class join windows from the command line
//!
//! Wires together:
//! - Configuration loading
//! - Backend clients (schedule, catalog, mock tests)
//! - The session window evaluator
//! - Reminder timers for the `watch` loop

mod commands;
mod watch;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use classgate_client::{ApiClient, ClientSession};
use classgate_config::{Policy, load_config_or_default};
use classgate_util::default_config_path;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// classgate - join windows, countdowns and reminders for live classes
#[derive(Parser, Debug)]
#[command(name = "classgate")]
#[command(about = "Join windows, countdowns and reminders for live classes", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/classgate/config.toml)
    #[arg(short, long, global = true, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Backend base URL override
    #[arg(short, long, global = true, env = "CLASSGATE_BASE_URL")]
    base_url: Option<String>,

    /// Bearer token for the student's account
    #[arg(short, long, global = true, env = "CLASSGATE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Log level
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one session window without contacting the backend
    Evaluate {
        /// Session start (RFC 3339, ISO date-time, date, or epoch millis)
        #[arg(long)]
        start: Option<String>,

        /// Session end
        #[arg(long)]
        end: Option<String>,

        /// Evaluate at this instant instead of now
        #[arg(long)]
        now: Option<String>,

        /// Join link, to derive the offered action
        #[arg(long)]
        join_link: Option<String>,

        /// Recording URL, to derive the offered action
        #[arg(long)]
        recording_url: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the student's live class schedule
    Schedule {
        /// Also include standalone live classes
        #[arg(long)]
        all: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Poll the schedule and report join windows and reminders until interrupted
    Watch,

    /// List courses
    Courses {
        /// Only courses the student is enrolled in
        #[arg(long)]
        mine: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the mock test tree, or one test with its attempts
    MockTests {
        /// Test ID; omit to list the tree
        id: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

impl Args {
    fn load_policy(&self) -> Result<Policy> {
        load_config_or_default(&self.config)
            .with_context(|| format!("Failed to load config from {:?}", self.config))
    }

    fn api_client(&self, policy: &Policy) -> Result<ApiClient> {
        let session =
            ClientSession::from_config(&policy.api, self.base_url.as_deref(), self.token.clone())
                .context("No usable backend URL; set [api].base_url or pass --base-url")?;

        info!(
            base_url = %session.base_url,
            authenticated = session.token.is_some(),
            "Backend session ready"
        );

        ApiClient::new(session).context("Failed to build HTTP client")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "classgate starting");
    if classgate_util::is_mock_time_active() {
        warn!(now = %classgate_util::now(), "Clock overridden by {}", classgate_util::MOCK_TIME_ENV_VAR);
    }

    let policy = args.load_policy()?;
    info!(
        config_path = %args.config.display(),
        join_lead_min = policy.window.join_lead.num_minutes(),
        join_grace_min = policy.window.join_grace.num_minutes(),
        "Configuration loaded"
    );

    match &args.command {
        Command::Evaluate {
            start,
            end,
            now,
            join_link,
            recording_url,
            json,
        } => commands::evaluate(
            &policy,
            commands::EvaluateInput {
                start: start.as_deref(),
                end: end.as_deref(),
                now: now.as_deref(),
                join_link: join_link.as_deref(),
                recording_url: recording_url.as_deref(),
            },
            *json,
        ),
        Command::Schedule { all, json } => {
            let api = args.api_client(&policy)?;
            commands::schedule(&policy, api, *all, *json).await
        }
        Command::Watch => {
            let api = args.api_client(&policy)?;
            watch::Watcher::new(policy, api).run().await
        }
        Command::Courses { mine, json } => {
            let api = args.api_client(&policy)?;
            commands::courses(api, *mine, *json).await
        }
        Command::MockTests { id, json } => {
            let api = args.api_client(&policy)?;
            match id {
                Some(id) => commands::mock_test(api, id, *json).await,
                None => commands::mock_test_tree(api, *json).await,
            }
        }
    }
}
