//! Import command: replace all stored data from a JSON backup.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use pl_core::{Snapshot, Store, Tracker};

pub fn run<W: Write, S: Store>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    file: Option<&Path>,
) -> Result<()> {
    let raw = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read backup from stdin")?;
            buffer
        }
    };

    let snapshot = parse_snapshot(&raw)?;
    report(writer, tracker, snapshot)
}

fn parse_snapshot(raw: &str) -> Result<Snapshot> {
    serde_json::from_str(raw).context("invalid backup document")
}

fn report<W: Write, S: Store>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    snapshot: Snapshot,
) -> Result<()> {
    let (events, leaves, holidays) = (
        snapshot.events.len(),
        snapshot.leaves.len(),
        snapshot.holidays.len(),
    );
    tracker.import(snapshot);
    writeln!(
        writer,
        "Imported {events} punches, {leaves} leaves, {holidays} holidays"
    )?;
    Ok(())
}
