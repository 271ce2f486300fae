//! Status command: presence plus progress against goals.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};

use pl_core::{PunchStatus, Store, Tracker};

use super::util::{format_hours, progress_bar};

pub fn run<W: Write, S: Store>(
    writer: &mut W,
    tracker: &Tracker<S>,
    now: DateTime<Utc>,
) -> Result<()> {
    match tracker.punch_status() {
        PunchStatus::In { since } => {
            writeln!(
                writer,
                "IN since {}",
                since.with_timezone(&Local).format("%H:%M")
            )?;
        }
        PunchStatus::Out => writeln!(writer, "OUT")?,
    }

    let today = tracker.today_progress(now);
    writeln!(
        writer,
        "Today:  {} {} / {}",
        progress_bar(today.filled()),
        format_hours(today.actual),
        format_hours(today.target),
    )?;

    let week = tracker.weekly_progress(now);
    let over = if week.excess() > 0.0 {
        format!(" (+{} over goal)", format_hours(week.excess() * week.target))
    } else {
        String::new()
    };
    writeln!(
        writer,
        "Week:   {} {} / {}{over}",
        progress_bar(week.filled()),
        format_hours(week.actual),
        format_hours(week.target),
    )?;

    writeln!(
        writer,
        "Month:  {}",
        format_hours(tracker.month_hours(now))
    )?;
    Ok(())
}
