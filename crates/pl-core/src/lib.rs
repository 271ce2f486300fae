//! Core attendance engine for punchlog.
//!
//! This crate contains the fundamental types and logic for:
//! - Pairing: turning the punch log into closed/open work intervals
//! - Aggregation: windowed duration sums over local calendar days/weeks/months
//! - Goals: daily/weekly targets, holiday reductions, progress ratios
//! - Ledger: leave/holiday records with uniqueness and exclusion invariants
//! - Tracker: the context object tying state to a persistence collaborator

pub mod aggregate;
pub mod event;
pub mod goal;
pub mod ledger;
pub mod pairing;
pub mod snapshot;
pub mod tracker;
pub mod types;

pub use event::PunchEvent;
pub use goal::{DayKind, DayMarker, GoalProgress, Goals};
pub use ledger::{HolidayRecord, LeaveLimits, LeaveRecord, LedgerError};
pub use pairing::{WorkInterval, pair_intervals};
pub use snapshot::Snapshot;
pub use tracker::{DaySummary, PunchStatus, Store, Tracker};
pub use types::{DayKey, LeaveKind, PunchKind, RecordId, ValidationError, WeekdaySet};
