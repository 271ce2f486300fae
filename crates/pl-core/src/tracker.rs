//! The tracker context: in-memory state plus the persistence collaborator.
//!
//! All mutation goes through [`Tracker`] methods returning results, so the
//! engine is deterministic to test without a live UI. Each mutating
//! operation updates memory first and then asks the store to persist the
//! entire affected collection. A store failure is logged at this boundary
//! and the in-memory change is kept; memory and disk may diverge until the
//! next successful write. Store reads behave the same way: a failed load
//! starts the tracker from defaults.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::aggregate::{
    duration_for_day, local_date, month_hours, today_hours, week_hours,
};
use crate::event::PunchEvent;
use crate::goal::{
    DayKind, DayMarker, GoalProgress, Goals, classify_day, day_marker, effective_weekly_goal,
};
use crate::ledger::{
    HolidayRecord, LeaveLimits, LeaveRecord, LedgerError, check_new_holiday, check_new_leave,
    remaining_leaves,
};
use crate::snapshot::Snapshot;
use crate::types::{DayKey, LeaveKind, PunchKind, RecordId, WeekdaySet};

/// The persistence collaborator.
///
/// Implementations persist whole collections at a time (overwrite, not
/// append) and load everything at open. [`Store::replace_all`] must replace
/// all six collections as one atomic unit.
pub trait Store {
    /// The implementation's error type.
    type Error: std::error::Error;

    /// Loads the full stored state. Absent data maps to defaults.
    fn load(&self) -> Result<Snapshot, Self::Error>;

    /// Overwrites the stored punch log.
    fn replace_events(&mut self, events: &[PunchEvent]) -> Result<(), Self::Error>;

    /// Overwrites the stored leave records.
    fn replace_leaves(&mut self, leaves: &[LeaveRecord]) -> Result<(), Self::Error>;

    /// Overwrites the stored holiday records.
    fn replace_holidays(&mut self, holidays: &[HolidayRecord]) -> Result<(), Self::Error>;

    /// Overwrites the stored weekly-off set.
    fn replace_weekly_holidays(&mut self, days: &WeekdaySet) -> Result<(), Self::Error>;

    /// Overwrites the stored goals.
    fn replace_goals(&mut self, goals: &Goals) -> Result<(), Self::Error>;

    /// Overwrites the stored leave limits.
    fn replace_leave_limits(&mut self, limits: &LeaveLimits) -> Result<(), Self::Error>;

    /// Replaces all six collections atomically.
    fn replace_all(&mut self, snapshot: &Snapshot) -> Result<(), Self::Error>;
}

/// Current presence state derived from the last punch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunchStatus {
    /// An open session started at `since`.
    In { since: DateTime<Utc> },
    /// No open session.
    Out,
}

/// Per-day report row: duration, target, and goal shading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub worked_hours: f64,
    pub target_hours: f64,
    pub kind: DayKind,
    pub marker: DayMarker,
}

/// The attendance engine context.
///
/// Owns the six stored collections in memory and a [`Store`] collaborator.
pub struct Tracker<S: Store> {
    store: S,
    events: Vec<PunchEvent>,
    leaves: Vec<LeaveRecord>,
    holidays: Vec<HolidayRecord>,
    weekly_holidays: WeekdaySet,
    goals: Goals,
    leave_limits: LeaveLimits,
}

impl<S: Store> Tracker<S> {
    /// Opens a tracker over the given store.
    ///
    /// A failed load is logged and the tracker starts from defaults.
    pub fn open(store: S) -> Self {
        let snapshot = match store.load() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::error!(error = %err, "failed to load stored state; starting from defaults");
                Snapshot::default()
            }
        };
        Self {
            store,
            events: snapshot.events,
            leaves: snapshot.leaves,
            holidays: snapshot.holidays,
            weekly_holidays: snapshot.weekly_holidays,
            goals: snapshot.goals,
            leave_limits: snapshot.leave_limits,
        }
    }

    // ========== Punching ==========

    /// Records a punch at `now`, toggling against the last recorded punch.
    ///
    /// Returns the kind that was recorded.
    pub fn punch(&mut self, now: DateTime<Utc>) -> PunchKind {
        let kind = match self.events.last() {
            Some(last) if last.kind == PunchKind::Entry => PunchKind::Exit,
            _ => PunchKind::Entry,
        };
        self.events.push(PunchEvent::record(now, kind));
        if let Err(err) = self.store.replace_events(&self.events) {
            tracing::error!(error = %err, "failed to persist punch log; in-memory state kept");
        }
        kind
    }

    /// Presence state derived from the last punch.
    #[must_use]
    pub fn punch_status(&self) -> PunchStatus {
        match self.events.last() {
            Some(last) if last.kind == PunchKind::Entry => PunchStatus::In {
                since: last.timestamp,
            },
            _ => PunchStatus::Out,
        }
    }

    // ========== Ledger ==========

    /// Records a leave day after the quota/duplicate/conflict gates pass.
    ///
    /// `today` anchors the quota year. Returns the stored record.
    pub fn add_leave(
        &mut self,
        date: DayKey,
        kind: LeaveKind,
        note: Option<String>,
        today: NaiveDate,
    ) -> Result<LeaveRecord, LedgerError> {
        check_new_leave(
            &self.leaves,
            &self.holidays,
            &self.leave_limits,
            &date,
            kind,
            today.year(),
        )?;
        let record = LeaveRecord {
            id: RecordId::generate(),
            date,
            kind,
            note,
        };
        self.leaves.push(record.clone());
        if let Err(err) = self.store.replace_leaves(&self.leaves) {
            tracing::error!(error = %err, "failed to persist leaves; in-memory state kept");
        }
        Ok(record)
    }

    /// Records a holiday after the duplicate/conflict gates pass.
    pub fn add_holiday(
        &mut self,
        date: DayKey,
        note: Option<String>,
    ) -> Result<HolidayRecord, LedgerError> {
        check_new_holiday(&self.leaves, &self.holidays, &date)?;
        let record = HolidayRecord {
            id: RecordId::generate(),
            date,
            note,
        };
        self.holidays.push(record.clone());
        if let Err(err) = self.store.replace_holidays(&self.holidays) {
            tracing::error!(error = %err, "failed to persist holidays; in-memory state kept");
        }
        Ok(record)
    }

    /// Remaining quota for `kind` in the calendar year of `today`.
    #[must_use]
    pub fn remaining_leaves(&self, kind: LeaveKind, today: NaiveDate) -> u32 {
        remaining_leaves(
            &self.leaves,
            &self.leave_limits,
            kind,
            today.year(),
        )
    }

    // ========== Settings ==========

    /// Replaces the configured goals.
    pub fn update_goals(&mut self, goals: Goals) {
        self.goals = goals;
        if let Err(err) = self.store.replace_goals(&self.goals) {
            tracing::error!(error = %err, "failed to persist goals; in-memory state kept");
        }
    }

    /// Replaces the yearly leave limits.
    pub fn update_leave_limits(&mut self, limits: LeaveLimits) {
        self.leave_limits = limits;
        if let Err(err) = self.store.replace_leave_limits(&self.leave_limits) {
            tracing::error!(error = %err, "failed to persist leave limits; in-memory state kept");
        }
    }

    /// Replaces the weekly-off set.
    pub fn update_weekly_holidays(&mut self, days: WeekdaySet) {
        self.weekly_holidays = days;
        if let Err(err) = self.store.replace_weekly_holidays(&self.weekly_holidays) {
            tracing::error!(error = %err, "failed to persist weekly holidays; in-memory state kept");
        }
    }

    // ========== Backup ==========

    /// Clones the full in-memory state into a backup document.
    #[must_use]
    pub fn export(&self) -> Snapshot {
        Snapshot {
            events: self.events.clone(),
            leaves: self.leaves.clone(),
            holidays: self.holidays.clone(),
            weekly_holidays: self.weekly_holidays.clone(),
            goals: self.goals,
            leave_limits: self.leave_limits,
        }
    }

    /// Replaces all six collections from a backup document.
    ///
    /// The store-side replacement is one atomic unit.
    pub fn import(&mut self, snapshot: Snapshot) {
        if let Err(err) = self.store.replace_all(&snapshot) {
            tracing::error!(error = %err, "failed to persist imported state; in-memory state kept");
        }
        self.events = snapshot.events;
        self.leaves = snapshot.leaves;
        self.holidays = snapshot.holidays;
        self.weekly_holidays = snapshot.weekly_holidays;
        self.goals = snapshot.goals;
        self.leave_limits = snapshot.leave_limits;
    }

    // ========== Aggregation queries ==========

    /// Worked hours since local midnight.
    #[must_use]
    pub fn today_hours(&self, now: DateTime<Utc>) -> f64 {
        today_hours(&self.events, now)
    }

    /// Worked hours since Monday of the current local week.
    #[must_use]
    pub fn week_hours(&self, now: DateTime<Utc>) -> f64 {
        week_hours(&self.events, now)
    }

    /// Worked hours since the first of the current local month.
    #[must_use]
    pub fn month_hours(&self, now: DateTime<Utc>) -> f64 {
        month_hours(&self.events, now)
    }

    /// Worked hours for one local calendar day.
    #[must_use]
    pub fn hours_for_date(&self, date: NaiveDate) -> f64 {
        duration_for_day(&self.events, date)
    }

    /// Weekly target after holiday reductions for the week containing `today`.
    #[must_use]
    pub fn effective_weekly_goal(&self, today: NaiveDate) -> f64 {
        effective_weekly_goal(&self.goals, &self.holidays, today)
    }

    /// Progress against today's daily target.
    #[must_use]
    pub fn today_progress(&self, now: DateTime<Utc>) -> GoalProgress {
        let today = local_date(now);
        GoalProgress::new(self.today_hours(now), self.goals.daily_target(today))
    }

    /// Progress against the effective weekly target.
    #[must_use]
    pub fn weekly_progress(&self, now: DateTime<Utc>) -> GoalProgress {
        let today = local_date(now);
        GoalProgress::new(self.week_hours(now), self.effective_weekly_goal(today))
    }

    /// Full report row for one calendar day.
    #[must_use]
    pub fn day_summary(&self, date: NaiveDate, today: NaiveDate) -> DaySummary {
        let worked_hours = self.hours_for_date(date);
        let target_hours = self.goals.daily_target(date);
        let kind = classify_day(date, &self.weekly_holidays, &self.leaves, &self.holidays);
        let marker = day_marker(kind, worked_hours, target_hours, date, today);
        DaySummary {
            date,
            worked_hours,
            target_hours,
            kind,
            marker,
        }
    }

    // ========== Accessors ==========

    /// The punch log, oldest first.
    #[must_use]
    pub fn events(&self) -> &[PunchEvent] {
        &self.events
    }

    /// Recorded leaves.
    #[must_use]
    pub fn leaves(&self) -> &[LeaveRecord] {
        &self.leaves
    }

    /// Recorded holidays.
    #[must_use]
    pub fn holidays(&self) -> &[HolidayRecord] {
        &self.holidays
    }

    /// The weekly-off set.
    #[must_use]
    pub fn weekly_holidays(&self) -> &WeekdaySet {
        &self.weekly_holidays
    }

    /// The configured goals.
    #[must_use]
    pub fn goals(&self) -> &Goals {
        &self.goals
    }

    /// The configured leave limits.
    #[must_use]
    pub fn leave_limits(&self) -> &LeaveLimits {
        &self.leave_limits
    }
}
