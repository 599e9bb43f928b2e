//! Pomodoro time windows
//!
//! Totals cover `[start, now]` for three windows: the current day, the
//! current ISO week (starting Monday) and the current calendar month.

use chrono::{Datelike, Duration, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Window starts derived from a single "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindows {
    pub now: NaiveDateTime,
    pub day_start: NaiveDateTime,
    pub week_start: NaiveDateTime,
    pub month_start: NaiveDateTime,
}

impl TimeWindows {
    /// Compute the day, week and month starts for `now`
    pub fn at(now: NaiveDateTime) -> Self {
        let today = now.date();
        let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
        let first_of_month = today.with_day(1).unwrap_or(today);

        Self {
            now,
            day_start: today.and_time(NaiveTime::MIN),
            week_start: monday.and_time(NaiveTime::MIN),
            month_start: first_of_month.and_time(NaiveTime::MIN),
        }
    }

    /// Oldest boundary; rows before it never count
    pub fn earliest(&self) -> NaiveDateTime {
        self.week_start.min(self.month_start)
    }
}

/// Summed pomodoro seconds per window
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct PomodoroTotals {
    pub daily: i64,
    pub weekly: i64,
    pub monthly: i64,
}

impl PomodoroTotals {
    /// Fold `(timestamp, duration)` pairs into the three windows
    ///
    /// Entries after `now` are ignored. No entries yields all zeros.
    pub fn from_logs<I>(windows: &TimeWindows, logs: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDateTime, i64)>,
    {
        let mut totals = Self::default();
        for (at, duration) in logs {
            if at > windows.now {
                continue;
            }
            if at >= windows.month_start {
                totals.monthly = totals.monthly.saturating_add(duration);
            }
            if at >= windows.week_start {
                totals.weekly = totals.weekly.saturating_add(duration);
            }
            if at >= windows.day_start {
                totals.daily = totals.daily.saturating_add(duration);
            }
        }
        totals
    }
}
