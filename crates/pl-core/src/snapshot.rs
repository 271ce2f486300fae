//! The export/import payload: all six stored collections in one document.

use serde::{Deserialize, Serialize};

use crate::event::PunchEvent;
use crate::goal::Goals;
use crate::ledger::{HolidayRecord, LeaveLimits, LeaveRecord};
use crate::types::WeekdaySet;

/// A full backup of the record store.
///
/// Every field carries a serde default, so a partial backup (or one written
/// by an older build) imports with the stated defaults filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub events: Vec<PunchEvent>,
    pub leaves: Vec<LeaveRecord>,
    pub holidays: Vec<HolidayRecord>,
    pub weekly_holidays: WeekdaySet,
    pub goals: Goals,
    pub leave_limits: LeaveLimits,
}
