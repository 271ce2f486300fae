//! Pairing of punch events into work intervals.
//!
//! A chronological punch log is interpreted with a greedy single pass:
//! an `ENTRY` immediately followed by an `EXIT` forms a closed interval and
//! both punches are consumed; an `ENTRY` followed by anything else (another
//! `ENTRY`, or nothing) forms an open interval measured up to the evaluation
//! instant, and only the `ENTRY` is consumed. An `EXIT` seen outside a pair
//! is skipped.
//!
//! # Policy
//!
//! Consecutive `ENTRY` punches are kept, not rejected: each un-paired
//! `ENTRY` yields an interval truncated at the evaluation instant, never at
//! the next `ENTRY`. A stale open `ENTRY` deep in history therefore still
//! measures up to `until`. This matches how the log has always been read and
//! keeps the scan total (no error path).

use chrono::{DateTime, Utc};

use crate::event::PunchEvent;
use crate::types::PunchKind;

/// A derived work session. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkInterval {
    /// Session start.
    pub start: DateTime<Utc>,
    /// Session end, or `None` while the session is still open.
    pub end: Option<DateTime<Utc>>,
}

impl WorkInterval {
    /// Whether the interval has no recorded end.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// The recorded end, or `until` for an open interval.
    #[must_use]
    pub fn end_or(&self, until: DateTime<Utc>) -> DateTime<Utc> {
        self.end.unwrap_or(until)
    }

    /// Interval length in milliseconds, clamped at zero.
    ///
    /// The clamp only matters for an open interval evaluated at an instant
    /// before its start (e.g. a day window that ends before the punch).
    #[must_use]
    pub fn duration_ms(&self, until: DateTime<Utc>) -> i64 {
        (self.end_or(until) - self.start).num_milliseconds().max(0)
    }
}

/// Pairs a chronological punch log into work intervals.
///
/// Intervals come out in chronological order with non-overlapping closed
/// ranges. Any number of open intervals may appear (one per un-paired
/// `ENTRY`); callers resolve their ends against an evaluation instant via
/// [`WorkInterval::end_or`].
#[must_use]
pub fn pair_intervals(events: &[PunchEvent]) -> Vec<WorkInterval> {
    let mut intervals = Vec::new();
    let mut i = 0;

    while i < events.len() {
        let event = &events[i];
        if event.kind == PunchKind::Entry {
            match events.get(i + 1) {
                Some(next) if next.kind == PunchKind::Exit => {
                    intervals.push(WorkInterval {
                        start: event.timestamp,
                        end: Some(next.timestamp),
                    });
                    i += 2;
                    continue;
                }
                _ => {
                    intervals.push(WorkInterval {
                        start: event.timestamp,
                        end: None,
                    });
                }
            }
        }
        // EXIT outside a pair: nothing to emit.
        i += 1;
    }

    intervals
}

/// Sums interval durations in fractional milliseconds.
#[must_use]
pub fn total_duration_ms(events: &[PunchEvent], until: DateTime<Utc>) -> i64 {
    pair_intervals(events)
        .iter()
        .map(|interval| interval.duration_ms(until))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RecordId;
    use chrono::{Duration, TimeZone};

    fn ts(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 13, 9, 0, 0)
            .single()
            .expect("valid test timestamp")
            + Duration::minutes(minutes)
    }

    fn punch(minutes: i64, kind: PunchKind) -> PunchEvent {
        PunchEvent {
            id: RecordId::generate(),
            timestamp: ts(minutes),
            kind,
        }
    }

    #[test]
    fn empty_log_yields_no_intervals() {
        assert!(pair_intervals(&[]).is_empty());
        assert_eq!(total_duration_ms(&[], ts(0)), 0);
    }

    #[test]
    fn entry_exit_forms_closed_interval() {
        let events = [punch(0, PunchKind::Entry), punch(90, PunchKind::Exit)];
        let intervals = pair_intervals(&events);

        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start, ts(0));
        assert_eq!(intervals[0].end, Some(ts(90)));
        // `until` does not affect a closed interval.
        assert_eq!(total_duration_ms(&events, ts(600)), 90 * 60 * 1000);
        assert_eq!(total_duration_ms(&events, ts(90)), 90 * 60 * 1000);
    }

    #[test]
    fn trailing_entry_is_open_until_evaluation_instant() {
        let events = [punch(0, PunchKind::Entry)];
        let intervals = pair_intervals(&events);

        assert_eq!(intervals.len(), 1);
        assert!(intervals[0].is_open());
        assert_eq!(total_duration_ms(&events, ts(45)), 45 * 60 * 1000);
    }

    #[test]
    fn leading_exit_is_skipped() {
        let events = [
            punch(0, PunchKind::Exit),
            punch(10, PunchKind::Entry),
            punch(40, PunchKind::Exit),
        ];
        let intervals = pair_intervals(&events);

        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start, ts(10));
        assert_eq!(intervals[0].end, Some(ts(40)));
    }

    #[test]
    fn duplicate_exit_is_skipped() {
        let events = [
            punch(0, PunchKind::Entry),
            punch(30, PunchKind::Exit),
            punch(31, PunchKind::Exit),
        ];
        assert_eq!(total_duration_ms(&events, ts(60)), 30 * 60 * 1000);
    }

    #[test]
    fn consecutive_entries_each_measure_to_until() {
        // The first ENTRY is never closed by the second; both run to `until`.
        let events = [
            punch(0, PunchKind::Entry),
            punch(10, PunchKind::Entry),
            punch(40, PunchKind::Exit),
        ];
        let intervals = pair_intervals(&events);

        assert_eq!(intervals.len(), 2);
        assert!(intervals[0].is_open());
        assert_eq!(intervals[1].end, Some(ts(40)));
        // 60 min open + 30 min closed.
        assert_eq!(total_duration_ms(&events, ts(60)), 90 * 60 * 1000);
    }

    #[test]
    fn interval_starts_are_non_decreasing_and_closed_ranges_disjoint() {
        let events = [
            punch(0, PunchKind::Entry),
            punch(20, PunchKind::Exit),
            punch(25, PunchKind::Entry),
            punch(50, PunchKind::Exit),
            punch(55, PunchKind::Entry),
        ];
        let intervals = pair_intervals(&events);

        for pair in intervals.windows(2) {
            assert!(pair[0].start <= pair[1].start);
            if let Some(end) = pair[0].end {
                assert!(end <= pair[1].start);
            }
        }
    }

    #[test]
    fn pairing_is_idempotent_over_immutable_log() {
        let events = [
            punch(0, PunchKind::Entry),
            punch(20, PunchKind::Exit),
            punch(30, PunchKind::Entry),
        ];
        let first = pair_intervals(&events);
        let second = pair_intervals(&events);
        assert_eq!(first, second);
        assert_eq!(
            total_duration_ms(&events, ts(60)),
            total_duration_ms(&events, ts(60))
        );
    }

    #[test]
    fn open_interval_before_window_end_clamps_to_zero() {
        let interval = WorkInterval {
            start: ts(30),
            end: None,
        };
        assert_eq!(interval.duration_ms(ts(10)), 0);
    }
}
