//! Config validation CLI tool
//!
//! Validates a classgate configuration file and reports any errors.

use classgate_util::default_config_path;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a classgate configuration file.");
            eprintln!();
            eprintln!("If no path is provided, uses: {}", default_path.display());
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match classgate_config::load_config(&config_path) {
        Ok(policy) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", classgate_config::CURRENT_CONFIG_VERSION);
            println!(
                "  Join window: {} min before start .. {} min after end",
                policy.window.join_lead.num_minutes(),
                policy.window.join_grace.num_minutes()
            );
            println!(
                "  Countdown horizon: {} days",
                policy.window.countdown_horizon.num_days()
            );
            println!(
                "  API base URL: {}",
                policy.api.base_url.as_deref().unwrap_or("(not set)")
            );
            println!("  Poll interval: {}s", policy.api.poll_interval.as_secs());
            if policy.reminders.enabled {
                let leads: Vec<String> = policy
                    .reminders
                    .leads
                    .iter()
                    .map(|d| format!("{}m", d.num_minutes()))
                    .collect();
                println!("  Reminders: {}", leads.join(", "));
            } else {
                println!("  Reminders: disabled");
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                classgate_config::ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                classgate_config::ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                classgate_config::ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                classgate_config::ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        classgate_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
