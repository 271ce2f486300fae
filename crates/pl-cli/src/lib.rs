//! Library surface of the punchlog CLI.
//!
//! Exposes the argument definitions, configuration loading, and command
//! implementations so integration tests can drive them directly.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Commands, GoalsAction, HolidayAction, LeaveAction, LeaveKindArg};
pub use config::Config;
