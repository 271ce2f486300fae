//! Leave and holiday records and their admission gates.
//!
//! The two collections are append-only sets keyed by calendar day, with a
//! cross-exclusion invariant: a day holds at most one of {leave, holiday}.
//! Every gate rejects before any mutation, so a failed insert leaves prior
//! state untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{DayKey, LeaveKind, RecordId};

/// A recorded leave day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRecord {
    /// Unique identifier for this record.
    pub id: RecordId,
    /// The calendar day taken off.
    pub date: DayKey,
    /// Leave category, counted against its yearly quota.
    #[serde(rename = "type")]
    pub kind: LeaveKind,
    /// Optional free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A recorded one-off holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRecord {
    /// Unique identifier for this record.
    pub id: RecordId,
    /// The calendar day observed.
    pub date: DayKey,
    /// Optional free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Yearly leave quotas per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeaveLimits {
    pub sick: u32,
    pub casual: u32,
}

impl LeaveLimits {
    /// The quota for one leave category.
    #[must_use]
    pub const fn limit(&self, kind: LeaveKind) -> u32 {
        match kind {
            LeaveKind::Sick => self.sick,
            LeaveKind::Casual => self.casual,
        }
    }
}

impl Default for LeaveLimits {
    fn default() -> Self {
        Self {
            sick: 10,
            casual: 15,
        }
    }
}

/// Business-rule rejections for ledger inserts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A record of the same category already exists for the day.
    #[error("a record already exists for {date}")]
    Duplicate { date: DayKey },

    /// The mutually-exclusive sibling category already holds the day.
    #[error("{date} already holds a record of the other category")]
    Conflict { date: DayKey },

    /// The yearly quota for the category is exhausted.
    #[error("no {kind} leaves remaining this year")]
    LimitReached { kind: LeaveKind },
}

/// Remaining quota for `kind` in `year`, floored at zero.
///
/// Year scoping follows each record's `date` field, not its creation time.
#[must_use]
pub fn remaining_leaves(
    leaves: &[LeaveRecord],
    limits: &LeaveLimits,
    kind: LeaveKind,
    year: i32,
) -> u32 {
    let used = leaves
        .iter()
        .filter(|leave| leave.kind == kind && leave.date.year() == year)
        .count();
    let used = u32::try_from(used).unwrap_or(u32::MAX);
    limits.limit(kind).saturating_sub(used)
}

/// Admission gate for a new leave record.
///
/// Gates run in order: quota, duplicate, cross-category conflict. `year` is
/// the current calendar year the quota is charged against.
pub fn check_new_leave(
    leaves: &[LeaveRecord],
    holidays: &[HolidayRecord],
    limits: &LeaveLimits,
    date: &DayKey,
    kind: LeaveKind,
    year: i32,
) -> Result<(), LedgerError> {
    if remaining_leaves(leaves, limits, kind, year) == 0 {
        return Err(LedgerError::LimitReached { kind });
    }
    if leaves.iter().any(|leave| leave.date == *date) {
        return Err(LedgerError::Duplicate { date: date.clone() });
    }
    if holidays.iter().any(|holiday| holiday.date == *date) {
        return Err(LedgerError::Conflict { date: date.clone() });
    }
    Ok(())
}

/// Admission gate for a new holiday record, symmetric to leave admission.
pub fn check_new_holiday(
    leaves: &[LeaveRecord],
    holidays: &[HolidayRecord],
    date: &DayKey,
) -> Result<(), LedgerError> {
    if holidays.iter().any(|holiday| holiday.date == *date) {
        return Err(LedgerError::Duplicate { date: date.clone() });
    }
    if leaves.iter().any(|leave| leave.date == *date) {
        return Err(LedgerError::Conflict { date: date.clone() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leave(date: &str, kind: LeaveKind) -> LeaveRecord {
        LeaveRecord {
            id: RecordId::generate(),
            date: DayKey::new(date).unwrap(),
            kind,
            note: None,
        }
    }

    fn holiday(date: &str) -> HolidayRecord {
        HolidayRecord {
            id: RecordId::generate(),
            date: DayKey::new(date).unwrap(),
            note: None,
        }
    }

    #[test]
    fn default_limits() {
        let limits = LeaveLimits::default();
        assert_eq!(limits.sick, 10);
        assert_eq!(limits.casual, 15);
    }

    #[test]
    fn remaining_counts_only_matching_kind_and_year() {
        let leaves = vec![
            leave("2025-02-03", LeaveKind::Sick),
            leave("2025-02-04", LeaveKind::Casual),
            leave("2024-11-20", LeaveKind::Sick),
        ];
        let limits = LeaveLimits::default();

        assert_eq!(remaining_leaves(&leaves, &limits, LeaveKind::Sick, 2025), 9);
        assert_eq!(
            remaining_leaves(&leaves, &limits, LeaveKind::Casual, 2025),
            14
        );
        assert_eq!(remaining_leaves(&leaves, &limits, LeaveKind::Sick, 2024), 9);
    }

    #[test]
    fn remaining_floors_at_zero() {
        let leaves: Vec<LeaveRecord> = (1..=4)
            .map(|day| leave(&format!("2025-03-{day:02}"), LeaveKind::Sick))
            .collect();
        let limits = LeaveLimits { sick: 2, casual: 1 };
        assert_eq!(remaining_leaves(&leaves, &limits, LeaveKind::Sick, 2025), 0);
    }

    #[test]
    fn leave_gate_rejects_duplicate_date() {
        let leaves = vec![leave("2025-02-03", LeaveKind::Sick)];
        let date = DayKey::new("2025-02-03").unwrap();

        let err = check_new_leave(
            &leaves,
            &[],
            &LeaveLimits::default(),
            &date,
            LeaveKind::Casual,
            2025,
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::Duplicate { date });
    }

    #[test]
    fn leave_gate_rejects_holiday_conflict() {
        let holidays = vec![holiday("2025-02-03")];
        let date = DayKey::new("2025-02-03").unwrap();

        let err = check_new_leave(
            &[],
            &holidays,
            &LeaveLimits::default(),
            &date,
            LeaveKind::Sick,
            2025,
        )
        .unwrap_err();
        assert_eq!(err, LedgerError::Conflict { date });
    }

    #[test]
    fn leave_gate_rejects_exhausted_quota_before_date_checks() {
        let leaves = vec![leave("2025-01-02", LeaveKind::Sick)];
        let limits = LeaveLimits { sick: 1, casual: 0 };
        // Even a duplicate date reports LimitReached first: the quota gate
        // runs before the date gates.
        let date = DayKey::new("2025-01-02").unwrap();

        let err =
            check_new_leave(&leaves, &[], &limits, &date, LeaveKind::Sick, 2025).unwrap_err();
        assert_eq!(
            err,
            LedgerError::LimitReached {
                kind: LeaveKind::Sick
            }
        );
    }

    #[test]
    fn quota_resets_across_years() {
        let leaves = vec![leave("2024-06-01", LeaveKind::Sick)];
        let limits = LeaveLimits { sick: 1, casual: 1 };
        let date = DayKey::new("2025-06-01").unwrap();

        assert!(check_new_leave(&leaves, &[], &limits, &date, LeaveKind::Sick, 2025).is_ok());
    }

    #[test]
    fn holiday_gate_rejects_duplicate_and_conflict() {
        let leaves = vec![leave("2025-02-03", LeaveKind::Sick)];
        let holidays = vec![holiday("2025-02-10")];

        let dup = DayKey::new("2025-02-10").unwrap();
        assert_eq!(
            check_new_holiday(&leaves, &holidays, &dup).unwrap_err(),
            LedgerError::Duplicate { date: dup }
        );

        let conflict = DayKey::new("2025-02-03").unwrap();
        assert_eq!(
            check_new_holiday(&leaves, &holidays, &conflict).unwrap_err(),
            LedgerError::Conflict { date: conflict }
        );

        let fresh = DayKey::new("2025-02-17").unwrap();
        assert!(check_new_holiday(&leaves, &holidays, &fresh).is_ok());
    }

    #[test]
    fn leave_serde_uses_type_field() {
        let record = leave("2025-02-03", LeaveKind::Casual);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "CASUAL");
        assert_eq!(value["date"], "2025-02-03");
        assert!(value.get("note").is_none());
    }
}
