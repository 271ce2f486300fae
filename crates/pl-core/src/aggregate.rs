//! Windowed duration aggregation over the punch log.
//!
//! All windows follow the product's calendar rules: local-time calendar
//! days, Monday-start weeks. The "today", "this week" and "this month"
//! queries measure open sessions up to `now`; the single-day query truncates
//! an open session at the end of that day instead.

use chrono::{DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::event::PunchEvent;
use crate::pairing::total_duration_ms;

/// Milliseconds per hour, for fractional-hour conversion.
const MS_PER_HOUR: f64 = 3_600_000.0;

#[allow(clippy::cast_precision_loss)]
fn ms_to_hours(ms: i64) -> f64 {
    ms as f64 / MS_PER_HOUR
}

/// Converts a local date at midnight to UTC.
/// Handles DST ambiguity by picking the earlier time.
pub fn local_midnight_to_utc(local_date: NaiveDate) -> DateTime<Utc> {
    let midnight = local_date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        // Single or ambiguous (DST fall-back): use the earlier time
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => {
            // DST spring-forward gap at midnight is rare but possible
            // Use 1am local which is guaranteed to exist
            let one_am = local_date.and_time(NaiveTime::from_hms_opt(1, 0, 0).unwrap_or_default());
            Local
                .from_local_datetime(&one_am)
                .earliest()
                .map_or_else(|| midnight.and_utc(), |dt| dt.with_timezone(&Utc))
        }
    }
}

/// The local calendar date of an instant.
#[must_use]
pub fn local_date(now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&Local).date_naive()
}

/// The Monday starting the week containing `date`.
#[must_use]
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let days_since_monday = date.weekday().num_days_from_monday();
    date - Duration::days(i64::from(days_since_monday))
}

/// The first day of the month containing `date`.
#[must_use]
pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Sums worked hours across the whole log, open sessions measured to `until`.
#[must_use]
pub fn duration_hours(events: &[PunchEvent], until: DateTime<Utc>) -> f64 {
    ms_to_hours(total_duration_ms(events, until))
}

/// Sums worked hours over punches at or after `start`, up to `now`.
#[must_use]
pub fn duration_since(events: &[PunchEvent], start: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let windowed: Vec<PunchEvent> = events
        .iter()
        .filter(|event| event.timestamp >= start)
        .cloned()
        .collect();
    ms_to_hours(total_duration_ms(&windowed, now))
}

/// Worked hours for one local calendar day.
///
/// Punches are restricted to `[midnight, next midnight)` and an open session
/// is truncated at day end rather than `now`, so a finished day keeps a
/// stable total.
#[must_use]
pub fn duration_for_day(events: &[PunchEvent], day: NaiveDate) -> f64 {
    let start = local_midnight_to_utc(day);
    let end = local_midnight_to_utc(day + Duration::days(1));
    let windowed: Vec<PunchEvent> = events
        .iter()
        .filter(|event| event.timestamp >= start && event.timestamp < end)
        .cloned()
        .collect();
    ms_to_hours(total_duration_ms(&windowed, end))
}

/// Worked hours since local midnight.
#[must_use]
pub fn today_hours(events: &[PunchEvent], now: DateTime<Utc>) -> f64 {
    duration_since(events, local_midnight_to_utc(local_date(now)), now)
}

/// Worked hours since Monday of the current local week.
#[must_use]
pub fn week_hours(events: &[PunchEvent], now: DateTime<Utc>) -> f64 {
    let monday = start_of_week(local_date(now));
    duration_since(events, local_midnight_to_utc(monday), now)
}

/// Worked hours since the first of the current local month.
#[must_use]
pub fn month_hours(events: &[PunchEvent], now: DateTime<Utc>) -> f64 {
    let first = start_of_month(local_date(now));
    duration_since(events, local_midnight_to_utc(first), now)
}
