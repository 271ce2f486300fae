//! Goal targets, holiday-driven reductions, and progress ratios.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::aggregate::start_of_week;
use crate::ledger::{HolidayRecord, LeaveRecord};
use crate::types::WeekdaySet;

/// Configured daily/weekly hour targets.
///
/// Fridays carry their own shorter target; the weekly figure is the base
/// before holiday reductions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Goals {
    pub daily: f64,
    pub friday: f64,
    pub weekly: f64,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            daily: 5.0,
            friday: 3.0,
            weekly: 36.0,
        }
    }
}

impl Goals {
    /// The target for one calendar day: the Friday figure on Fridays,
    /// the daily figure otherwise.
    #[must_use]
    pub fn daily_target(&self, date: NaiveDate) -> f64 {
        if date.weekday() == Weekday::Fri {
            self.friday
        } else {
            self.daily
        }
    }
}

/// The weekly target after subtracting holiday reductions.
///
/// Each recorded holiday inside the Monday-start week containing `week_of`
/// reduces the target by that day's figure (the Friday figure for a Friday
/// holiday, the daily figure otherwise), floored at zero overall.
#[must_use]
pub fn effective_weekly_goal(goals: &Goals, holidays: &[HolidayRecord], week_of: NaiveDate) -> f64 {
    let monday = start_of_week(week_of);
    let sunday = monday + Duration::days(6);

    let reduction: f64 = holidays
        .iter()
        .map(|holiday| holiday.date.to_date())
        .filter(|date| *date >= monday && *date <= sunday)
        .map(|date| goals.daily_target(date))
        .sum();

    (goals.weekly - reduction).max(0.0)
}

/// Actual-vs-target progress, split for two-layer rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    /// Hours worked.
    pub actual: f64,
    /// Hours targeted.
    pub target: f64,
    /// `actual / target`; may exceed 1. A zero target maps to 1 when any
    /// positive work exists and 0 otherwise, so completion still reads.
    pub ratio: f64,
}

impl GoalProgress {
    /// Computes the ratio for an actual/target pair.
    #[must_use]
    pub fn new(actual: f64, target: f64) -> Self {
        let ratio = if target <= 0.0 {
            if actual > 0.0 { 1.0 } else { 0.0 }
        } else {
            actual / target
        };
        Self {
            actual,
            target,
            ratio,
        }
    }

    /// The portion of the ratio up to 100%.
    #[must_use]
    pub fn filled(&self) -> f64 {
        self.ratio.min(1.0)
    }

    /// The portion of the ratio beyond 100%.
    #[must_use]
    pub fn excess(&self) -> f64 {
        (self.ratio - 1.0).max(0.0)
    }
}

/// What kind of day the calendar holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    Workday,
    WeeklyOff,
    Leave,
    Holiday,
}

/// Classifies a calendar day against the weekly-off set and the ledger.
///
/// Ledger records win over the weekly-off set; the ledger's exclusion
/// invariant means a day can match at most one of leave/holiday.
#[must_use]
pub fn classify_day(
    date: NaiveDate,
    weekly_off: &WeekdaySet,
    leaves: &[LeaveRecord],
    holidays: &[HolidayRecord],
) -> DayKind {
    let key = crate::types::DayKey::from_date(date);
    if holidays.iter().any(|holiday| holiday.date == key) {
        DayKind::Holiday
    } else if leaves.iter().any(|leave| leave.date == key) {
        DayKind::Leave
    } else if weekly_off.contains(date.weekday()) {
        DayKind::WeeklyOff
    } else {
        DayKind::Workday
    }
}

/// Goal marker for one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayMarker {
    /// Workday that met its target.
    Met,
    /// Past workday below target.
    Missed,
    /// Today or a future workday below target.
    Pending,
    /// Weekly-off, leave, or holiday day: exempt from goal shading.
    Exempt,
}

/// Marks a day for goal shading.
///
/// Off days are exempt rather than missed; the daily target itself is not
/// reduced for them, only the shading is suppressed.
#[must_use]
pub fn day_marker(
    kind: DayKind,
    worked_hours: f64,
    target_hours: f64,
    date: NaiveDate,
    today: NaiveDate,
) -> DayMarker {
    if kind != DayKind::Workday {
        return DayMarker::Exempt;
    }
    if worked_hours >= target_hours {
        DayMarker::Met
    } else if date < today {
        DayMarker::Missed
    } else {
        DayMarker::Pending
    }
}
