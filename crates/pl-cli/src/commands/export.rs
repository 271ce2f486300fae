//! Export command: write a full JSON backup to stdout.

use std::io::Write;

use anyhow::{Context, Result};

use pl_core::{Store, Tracker};

pub fn run<W: Write, S: Store>(writer: &mut W, tracker: &Tracker<S>) -> Result<()> {
    let snapshot = tracker.export();
    serde_json::to_writer_pretty(&mut *writer, &snapshot).context("failed to encode backup")?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pl_core::Snapshot;
    use pl_db::Database;

    #[test]
    fn export_emits_parseable_snapshot() {
        let mut tracker = Tracker::open(Database::open_in_memory().unwrap());
        tracker.punch(Utc::now());

        let mut output = Vec::new();
        run(&mut output, &tracker).unwrap();

        let parsed: Snapshot = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed, tracker.export());
        assert_eq!(parsed.events.len(), 1);
    }
}
