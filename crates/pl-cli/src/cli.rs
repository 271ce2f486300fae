//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use pl_core::{DayKey, LeaveKind};

/// Personal attendance tracker.
///
/// Punch in and out, record leaves and holidays, and track progress against
/// daily and weekly hour goals.
#[derive(Debug, Parser)]
#[command(name = "pl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Record a punch, toggling between entry and exit.
    Punch,

    /// Show presence and progress against goals.
    Status,

    /// Render a month report of worked hours and goal markers.
    Report {
        /// Month to report, as YYYY-MM. Defaults to the current month.
        #[arg(long)]
        month: Option<String>,

        /// Emit JSON instead of the human-readable report.
        #[arg(long)]
        json: bool,
    },

    /// Record and inspect leave days.
    Leave {
        #[command(subcommand)]
        action: LeaveAction,
    },

    /// Record holidays.
    Holiday {
        #[command(subcommand)]
        action: HolidayAction,
    },

    /// Show or change goal targets.
    Goals {
        #[command(subcommand)]
        action: GoalsAction,
    },

    /// Replace the yearly leave limits.
    Limits {
        /// Yearly sick-leave quota.
        #[arg(long)]
        sick: u32,

        /// Yearly casual-leave quota.
        #[arg(long)]
        casual: u32,
    },

    /// Set the weekly-off weekdays (0 = Sunday .. 6 = Saturday).
    WeeklyOff {
        /// Weekday indices; pass none to clear the set.
        days: Vec<u8>,
    },

    /// Write a full JSON backup to stdout.
    Export,

    /// Replace all stored data from a JSON backup.
    Import {
        /// Backup file to read; stdin when omitted.
        file: Option<PathBuf>,
    },
}

/// Leave subcommands.
#[derive(Debug, Subcommand)]
pub enum LeaveAction {
    /// Record a leave day.
    Add {
        /// The calendar day, as YYYY-MM-DD.
        date: DayKey,

        /// Leave category.
        #[arg(long, value_enum)]
        kind: LeaveKindArg,

        /// Optional note.
        #[arg(long)]
        note: Option<String>,
    },

    /// Show the remaining quota per category for this year.
    Remaining,
}

/// Holiday subcommands.
#[derive(Debug, Subcommand)]
pub enum HolidayAction {
    /// Record a holiday.
    Add {
        /// The calendar day, as YYYY-MM-DD.
        date: DayKey,

        /// Optional note.
        #[arg(long)]
        note: Option<String>,
    },
}

/// Goals subcommands.
#[derive(Debug, Subcommand)]
pub enum GoalsAction {
    /// Print the configured targets.
    Show,

    /// Replace the configured targets.
    Set {
        /// Daily target hours.
        #[arg(long)]
        daily: f64,

        /// Friday target hours.
        #[arg(long)]
        friday: f64,

        /// Weekly target hours.
        #[arg(long)]
        weekly: f64,
    },
}

/// Leave category as a CLI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LeaveKindArg {
    Sick,
    Casual,
}

impl From<LeaveKindArg> for LeaveKind {
    fn from(arg: LeaveKindArg) -> Self {
        match arg {
            LeaveKindArg::Sick => Self::Sick,
            LeaveKindArg::Casual => Self::Casual,
        }
    }
}
