//! Report command: per-day worked hours and goal markers for one month.

use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result, bail};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use pl_core::{DayKind, DayMarker, Store, Tracker};

use super::util::format_hours;

/// Computed report data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    /// The reported month as `YYYY-MM`.
    pub month: String,
    /// IANA timezone the calendar days were computed in.
    pub timezone: String,
    pub days: Vec<DayRow>,
    pub total_hours: f64,
}

/// One calendar day of the report.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRow {
    pub date: NaiveDate,
    pub worked_hours: f64,
    pub target_hours: f64,
    pub kind: DayKind,
    pub marker: DayMarker,
}

/// Parses a `YYYY-MM` month argument into its first day.
pub fn parse_month(arg: &str) -> Result<NaiveDate> {
    let Some((year, month)) = arg.split_once('-') else {
        bail!("invalid month {arg:?}, expected YYYY-MM");
    };
    let year: i32 = year.parse().with_context(|| format!("invalid year in {arg:?}"))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("invalid month in {arg:?}"))?;
    NaiveDate::from_ymd_opt(year, month, 1)
        .with_context(|| format!("invalid month {arg:?}, expected YYYY-MM"))
}

/// All days of the month starting at `first`.
fn month_days(first: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut day = first;
    while day.month() == first.month() {
        days.push(day);
        day += Duration::days(1);
    }
    days
}

/// Generates report data for the month starting at `first`.
pub fn generate_report_data<S: Store>(
    tracker: &Tracker<S>,
    first: NaiveDate,
    today: NaiveDate,
) -> ReportData {
    let timezone = iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string());

    let days: Vec<DayRow> = month_days(first)
        .into_iter()
        .map(|date| {
            let summary = tracker.day_summary(date, today);
            DayRow {
                date,
                worked_hours: summary.worked_hours,
                target_hours: summary.target_hours,
                kind: summary.kind,
                marker: summary.marker,
            }
        })
        .collect();

    let total_hours = days.iter().map(|day| day.worked_hours).sum();

    ReportData {
        month: first.format("%Y-%m").to_string(),
        timezone,
        days,
        total_hours,
    }
}

/// Formats the human-readable report output.
pub fn format_report(data: &ReportData) -> String {
    let mut output = String::new();

    let title = data
        .days
        .first()
        .map_or_else(|| data.month.clone(), |row| row.date.format("%B %Y").to_string());
    let _ = writeln!(output, "{title}");

    for row in &data.days {
        let weekday = row.date.format("%a");
        let day = row.date.day();
        let off_label = match row.kind {
            DayKind::Workday => None,
            DayKind::WeeklyOff => Some("weekly off"),
            DayKind::Leave => Some("leave"),
            DayKind::Holiday => Some("holiday"),
        };
        if let Some(label) = off_label {
            if row.worked_hours > 0.005 {
                let _ = writeln!(
                    output,
                    "{weekday} {day:02}  {label} ({})",
                    format_hours(row.worked_hours),
                );
            } else {
                let _ = writeln!(output, "{weekday} {day:02}  {label}");
            }
        } else {
            let marker = match row.marker {
                DayMarker::Met => "met",
                DayMarker::Missed => "missed",
                DayMarker::Pending | DayMarker::Exempt => "pending",
            };
            let _ = writeln!(
                output,
                "{weekday} {day:02}  {} / {}  {marker}",
                format_hours(row.worked_hours),
                format_hours(row.target_hours),
            );
        }
    }

    let _ = writeln!(output, "Total: {}", format_hours(data.total_hours));
    output
}

pub fn run<W: Write, S: Store>(
    writer: &mut W,
    tracker: &Tracker<S>,
    month: Option<&str>,
    json: bool,
    today: NaiveDate,
) -> Result<()> {
    let first = match month {
        Some(arg) => parse_month(arg)?,
        None => today.with_day(1).unwrap_or(today),
    };
    let data = generate_report_data(tracker, first, today);

    if json {
        serde_json::to_writer_pretty(&mut *writer, &data).context("failed to encode report")?;
        writeln!(writer)?;
    } else {
        write!(writer, "{}", format_report(&data))?;
    }
    Ok(())
}
