//! Holiday command: record a one-off holiday.

use std::io::Write;

use anyhow::Result;

use pl_core::{DayKey, Store, Tracker};

pub fn add<W: Write, S: Store>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    date: DayKey,
    note: Option<String>,
) -> Result<()> {
    let record = tracker.add_holiday(date, note)?;
    writeln!(writer, "Recorded holiday on {}", record.date)?;
    Ok(())
}
