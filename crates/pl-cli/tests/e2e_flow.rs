//! End-to-end integration tests for the punchlog flow.
//!
//! Tests the full pipeline through the real binary: punch -> status ->
//! leave/holiday -> export -> import -> report.

use std::path::Path;
use std::process::{Command, Output, Stdio};

use chrono::Datelike;
use tempfile::TempDir;

fn pl_binary() -> String {
    env!("CARGO_BIN_EXE_pl").to_string()
}

fn pl(home: &Path, db: &Path, args: &[&str]) -> Output {
    Command::new(pl_binary())
        .env("HOME", home)
        .env("PL_DATABASE_PATH", db)
        .args(args)
        .output()
        .expect("failed to run pl")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn punch_toggles_and_status_reflects_it() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("pl.db");

    let first = pl(temp.path(), &db, &["punch"]);
    assert!(first.status.success(), "{}", stderr(&first));
    assert!(stdout(&first).contains("Punched in at "));

    let status = pl(temp.path(), &db, &["status"]);
    assert!(status.status.success());
    let status_out = stdout(&status);
    assert!(status_out.starts_with("IN since "), "{status_out}");
    assert!(status_out.contains("Today:"));

    let second = pl(temp.path(), &db, &["punch"]);
    assert!(stdout(&second).contains("Punched out at "));

    let status = pl(temp.path(), &db, &["status"]);
    assert!(stdout(&status).starts_with("OUT"), "{}", stdout(&status));
}

#[test]
fn ledger_rejections_surface_as_errors() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("pl.db");

    // A fixed day inside the current year, so the yearly quota counts it.
    let date = chrono::Local::now()
        .date_naive()
        .with_month(6)
        .and_then(|d| d.with_day(15))
        .unwrap()
        .format("%Y-%m-%d")
        .to_string();

    let added = pl(temp.path(), &db, &["leave", "add", &date, "--kind", "sick"]);
    assert!(added.status.success(), "{}", stderr(&added));
    assert!(stdout(&added).contains(&format!("Recorded sick leave on {date}")));

    // Same date again: duplicate, no second record.
    let duplicate = pl(
        temp.path(),
        &db,
        &["leave", "add", &date, "--kind", "casual"],
    );
    assert!(!duplicate.status.success());
    assert!(stderr(&duplicate).contains("already exists"));

    // A holiday on a leave day: cross-category conflict.
    let conflict = pl(temp.path(), &db, &["holiday", "add", &date]);
    assert!(!conflict.status.success());
    assert!(stderr(&conflict).contains("other category"));

    let remaining = pl(temp.path(), &db, &["leave", "remaining"]);
    let remaining_out = stdout(&remaining);
    assert!(remaining_out.contains("sick: 9 of 10 remaining"), "{remaining_out}");
    assert!(remaining_out.contains("casual: 15 of 15 remaining"));
}

#[test]
fn export_import_round_trip_preserves_backup() {
    let temp = TempDir::new().unwrap();
    let source_db = temp.path().join("source.db");
    let target_db = temp.path().join("target.db");

    pl(temp.path(), &source_db, &["punch"]);
    pl(temp.path(), &source_db, &["punch"]);
    pl(
        temp.path(),
        &source_db,
        &["leave", "add", "2025-02-03", "--kind", "casual", "--note", "errand"],
    );
    pl(temp.path(), &source_db, &["holiday", "add", "2025-03-21"]);
    pl(
        temp.path(),
        &source_db,
        &[
            "goals", "set", "--daily", "6", "--friday", "4", "--weekly", "40",
        ],
    );
    pl(temp.path(), &source_db, &["weekly-off", "0", "6"]);

    let exported = pl(temp.path(), &source_db, &["export"]);
    assert!(exported.status.success(), "{}", stderr(&exported));
    let backup = stdout(&exported);

    let parsed: serde_json::Value = serde_json::from_str(&backup).unwrap();
    assert_eq!(parsed["events"].as_array().unwrap().len(), 2);
    assert_eq!(parsed["leaves"][0]["type"], "CASUAL");
    assert_eq!(parsed["weeklyHolidays"], serde_json::json!([0, 6]));

    // Import into a fresh database via stdin.
    let mut import = Command::new(pl_binary())
        .env("HOME", temp.path())
        .env("PL_DATABASE_PATH", &target_db)
        .arg("import")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    {
        use std::io::Write;
        import
            .stdin
            .take()
            .unwrap()
            .write_all(backup.as_bytes())
            .unwrap();
    }
    let import = import.wait_with_output().unwrap();
    assert!(import.status.success(), "{}", stderr(&import));
    assert!(stdout(&import).contains("Imported 2 punches, 1 leaves, 1 holidays"));

    // Re-exporting the target reproduces the backup exactly.
    let re_exported = pl(temp.path(), &target_db, &["export"]);
    assert_eq!(stdout(&re_exported), backup);
}

#[test]
fn report_json_covers_the_month() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("pl.db");

    pl(temp.path(), &db, &["holiday", "add", "2025-01-17"]);

    let report = pl(
        temp.path(),
        &db,
        &["report", "--month", "2025-01", "--json"],
    );
    assert!(report.status.success(), "{}", stderr(&report));

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&report)).unwrap();
    assert_eq!(parsed["month"], "2025-01");
    let days = parsed["days"].as_array().unwrap();
    assert_eq!(days.len(), 31);
    // 2025-01-17 is the recorded holiday.
    assert_eq!(days[16]["kind"], "holiday");
    assert_eq!(days[16]["marker"], "exempt");
}

#[test]
fn goals_show_reports_updated_targets() {
    let temp = TempDir::new().unwrap();
    let db = temp.path().join("pl.db");

    let set = pl(
        temp.path(),
        &db,
        &[
            "goals", "set", "--daily", "7.5", "--friday", "2", "--weekly", "38",
        ],
    );
    assert!(set.status.success(), "{}", stderr(&set));

    let show = pl(temp.path(), &db, &["goals", "show"]);
    let show_out = stdout(&show);
    assert!(show_out.contains("daily:  7h 30m"), "{show_out}");
    assert!(show_out.contains("friday: 2h 0m"));
    assert!(show_out.contains("weekly: 38h 0m"));
}
