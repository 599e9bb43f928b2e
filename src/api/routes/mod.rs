//! API Routes
//!
//! Route handlers organized by domain.

pub mod basketball;
pub mod courses;
pub mod dashboard;
pub mod gym;
pub mod health;
pub mod index;
pub mod reset;
pub mod schedule;
pub mod study;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Utc};

/// Current wall-clock time as naive UTC
pub(crate) fn now_utc() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Today's date in UTC
pub(crate) fn today_utc() -> NaiveDate {
    now_utc().date()
}

/// Monday of the week containing `date`
pub(crate) fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monday_of() {
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(monday_of(sunday), NaiveDate::from_ymd_opt(2026, 10, 12).unwrap());

        let monday = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        assert_eq!(monday_of(monday), monday);
    }
}
