//! Settings commands: goals, leave limits, weekly-off weekdays.

use std::io::Write;

use anyhow::{Context, Result};

use pl_core::{Goals, LeaveLimits, Store, Tracker, WeekdaySet};

use super::util::format_hours;

pub fn show_goals<W: Write, S: Store>(writer: &mut W, tracker: &Tracker<S>) -> Result<()> {
    let goals = tracker.goals();
    writeln!(writer, "daily:  {}", format_hours(goals.daily))?;
    writeln!(writer, "friday: {}", format_hours(goals.friday))?;
    writeln!(writer, "weekly: {}", format_hours(goals.weekly))?;
    Ok(())
}

pub fn set_goals<W: Write, S: Store>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    goals: Goals,
) -> Result<()> {
    anyhow::ensure!(goals.daily > 0.0, "daily goal must be positive");
    anyhow::ensure!(goals.friday > 0.0, "friday goal must be positive");
    anyhow::ensure!(goals.weekly >= 0.0, "weekly goal must not be negative");

    tracker.update_goals(goals);
    writeln!(writer, "Goals updated")?;
    Ok(())
}

pub fn set_limits<W: Write, S: Store>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    limits: LeaveLimits,
) -> Result<()> {
    tracker.update_leave_limits(limits);
    writeln!(
        writer,
        "Leave limits updated (sick {}, casual {})",
        limits.sick, limits.casual
    )?;
    Ok(())
}

pub fn set_weekly_off<W: Write, S: Store>(
    writer: &mut W,
    tracker: &mut Tracker<S>,
    days: &[u8],
) -> Result<()> {
    let set = WeekdaySet::new(days.iter().copied())
        .context("weekday indices run 0 (Sunday) through 6 (Saturday)")?;
    tracker.update_weekly_holidays(set.clone());

    if set.is_empty() {
        writeln!(writer, "Weekly off days cleared")?;
    } else {
        let days: Vec<String> = set.iter().map(|day| weekday_name(day).to_string()).collect();
        writeln!(writer, "Weekly off: {}", days.join(", "))?;
    }
    Ok(())
}

const fn weekday_name(index: u8) -> &'static str {
    match index {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_db::Database;

    fn tracker() -> Tracker<Database> {
        Tracker::open(Database::open_in_memory().unwrap())
    }

    #[test]
    fn show_goals_prints_defaults() {
        let mut output = Vec::new();
        show_goals(&mut output, &tracker()).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "daily:  5h 0m\nfriday: 3h 0m\nweekly: 36h 0m\n"
        );
    }

    #[test]
    fn set_goals_rejects_non_positive_daily() {
        let mut tracker = tracker();
        let err = set_goals(
            &mut Vec::new(),
            &mut tracker,
            Goals {
                daily: 0.0,
                friday: 3.0,
                weekly: 36.0,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("daily goal"));
        assert_eq!(*tracker.goals(), Goals::default());
    }

    #[test]
    fn set_weekly_off_names_days() {
        let mut tracker = tracker();
        let mut output = Vec::new();
        set_weekly_off(&mut output, &mut tracker, &[0, 6]).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Weekly off: Sunday, Saturday\n"
        );
        assert!(tracker.weekly_holidays().contains_index(6));
    }

    #[test]
    fn set_weekly_off_rejects_bad_index() {
        let mut tracker = tracker();
        assert!(set_weekly_off(&mut Vec::new(), &mut tracker, &[9]).is_err());
        assert_eq!(*tracker.weekly_holidays(), WeekdaySet::default());
    }
}
