//! Leave commands: record a leave day, show remaining quotas.

use std::io::Write;

use anyhow::Result;
use chrono::NaiveDate;

use pl_core::{DayKey, LeaveKind, Store, Tracker};

pub fn add<W: Write, S: Store>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    date: DayKey,
    kind: LeaveKind,
    note: Option<String>,
    today: NaiveDate,
) -> Result<()> {
    let record = tracker.add_leave(date, kind, note, today)?;
    writeln!(
        writer,
        "Recorded {} leave on {} ({} remaining this year)",
        record.kind.as_str().to_lowercase(),
        record.date,
        tracker.remaining_leaves(kind, today),
    )?;
    Ok(())
}

pub fn remaining<W: Write, S: Store>(
    writer: &mut W,
    tracker: &Tracker<S>,
    today: NaiveDate,
) -> Result<()> {
    for kind in [LeaveKind::Sick, LeaveKind::Casual] {
        writeln!(
            writer,
            "{}: {} of {} remaining",
            kind.as_str().to_lowercase(),
            tracker.remaining_leaves(kind, today),
            tracker.leave_limits().limit(kind),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_db::Database;

    fn tracker() -> Tracker<Database> {
        Tracker::open(Database::open_in_memory().unwrap())
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
    }

    #[test]
    fn add_reports_remaining_quota() {
        let mut tracker = tracker();
        let mut output = Vec::new();
        add(
            &mut output,
            &mut tracker,
            DayKey::new("2025-02-03").unwrap(),
            LeaveKind::Sick,
            Some("flu".to_string()),
            today(),
        )
        .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Recorded sick leave on 2025-02-03 (9 remaining this year)\n"
        );
    }

    #[test]
    fn duplicate_add_surfaces_rejection() {
        let mut tracker = tracker();
        let date = DayKey::new("2025-02-03").unwrap();
        let mut output = Vec::new();

        add(
            &mut output,
            &mut tracker,
            date.clone(),
            LeaveKind::Sick,
            None,
            today(),
        )
        .unwrap();
        let err = add(
            &mut output,
            &mut tracker,
            date,
            LeaveKind::Sick,
            None,
            today(),
        )
        .unwrap_err();

        assert!(err.to_string().contains("already exists"));
        assert_eq!(tracker.leaves().len(), 1);
    }

    #[test]
    fn remaining_lists_both_categories() {
        let tracker = tracker();
        let mut output = Vec::new();
        remaining(&mut output, &tracker, today()).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("sick: 10 of 10 remaining"));
        assert!(output.contains("casual: 15 of 15 remaining"));
    }
}
