//! Punch command: toggle between entry and exit.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Local, Utc};

use pl_core::{PunchKind, Store, Tracker};

use super::util::format_hours;

pub fn run<W: Write, S: Store>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    now: DateTime<Utc>,
) -> Result<()> {
    let kind = tracker.punch(now);
    let local = now.with_timezone(&Local);

    match kind {
        PunchKind::Entry => {
            writeln!(writer, "Punched in at {}", local.format("%H:%M"))?;
        }
        PunchKind::Exit => {
            writeln!(
                writer,
                "Punched out at {} ({} today)",
                local.format("%H:%M"),
                format_hours(tracker.today_hours(now)),
            )?;
        }
    }
    Ok(())
}
