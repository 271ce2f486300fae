use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pl_cli::commands::{export, holiday, import, leave, punch, report, settings, status};
use pl_cli::{Cli, Commands, Config, GoalsAction, HolidayAction, LeaveAction};
use pl_core::{Goals, LeaveLimits, Tracker};
use pl_db::Database;

/// Load config and open the tracker, ensuring the parent directory exists.
fn open_tracker(config_path: Option<&Path>) -> Result<Tracker<Database>> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = Database::open(&config.database_path).context("failed to open database")?;
    Ok(Tracker::open(db))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let now = Utc::now();
    let today = Local::now().date_naive();

    match &cli.command {
        Some(Commands::Punch) => {
            let mut tracker = open_tracker(cli.config.as_deref())?;
            punch::run(&mut out, &mut tracker, now)?;
        }
        Some(Commands::Status) => {
            let tracker = open_tracker(cli.config.as_deref())?;
            status::run(&mut out, &tracker, now)?;
        }
        Some(Commands::Report { month, json }) => {
            let tracker = open_tracker(cli.config.as_deref())?;
            report::run(&mut out, &tracker, month.as_deref(), *json, today)?;
        }
        Some(Commands::Leave { action }) => {
            let mut tracker = open_tracker(cli.config.as_deref())?;
            match action {
                LeaveAction::Add { date, kind, note } => {
                    leave::add(
                        &mut out,
                        &mut tracker,
                        date.clone(),
                        (*kind).into(),
                        note.clone(),
                        today,
                    )?;
                }
                LeaveAction::Remaining => leave::remaining(&mut out, &tracker, today)?,
            }
        }
        Some(Commands::Holiday { action }) => {
            let mut tracker = open_tracker(cli.config.as_deref())?;
            match action {
                HolidayAction::Add { date, note } => {
                    holiday::add(&mut out, &mut tracker, date.clone(), note.clone())?;
                }
            }
        }
        Some(Commands::Goals { action }) => {
            let mut tracker = open_tracker(cli.config.as_deref())?;
            match action {
                GoalsAction::Show => settings::show_goals(&mut out, &tracker)?,
                GoalsAction::Set {
                    daily,
                    friday,
                    weekly,
                } => {
                    settings::set_goals(
                        &mut out,
                        &mut tracker,
                        Goals {
                            daily: *daily,
                            friday: *friday,
                            weekly: *weekly,
                        },
                    )?;
                }
            }
        }
        Some(Commands::Limits { sick, casual }) => {
            let mut tracker = open_tracker(cli.config.as_deref())?;
            settings::set_limits(
                &mut out,
                &mut tracker,
                LeaveLimits {
                    sick: *sick,
                    casual: *casual,
                },
            )?;
        }
        Some(Commands::WeeklyOff { days }) => {
            let mut tracker = open_tracker(cli.config.as_deref())?;
            settings::set_weekly_off(&mut out, &mut tracker, days)?;
        }
        Some(Commands::Export) => {
            let tracker = open_tracker(cli.config.as_deref())?;
            export::run(&mut out, &tracker)?;
        }
        Some(Commands::Import { file }) => {
            let mut tracker = open_tracker(cli.config.as_deref())?;
            import::run(&mut out, &mut tracker, file.as_deref())?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
