//! Derived metrics
//!
//! Pure functions that turn raw rows into the aggregates the dashboard shows.
//! Nothing here touches the database; repositories fetch rows and hand them
//! over, which keeps every rule testable on plain values.
//!
//! - [`time_totals`]: pomodoro totals for today, this week and this month
//! - [`study`]: lecture completion and its finished date
//! - [`courses`]: unit completion counts
//! - [`gym`]: free-text lift parsing and personal-record detection
//! - [`basketball`]: per-player box score

pub mod basketball;
pub mod courses;
pub mod gym;
pub mod study;
pub mod time_totals;

pub use basketball::{box_score, PlayerStats, POINTS_PER_MADE_SHOT};
pub use courses::{unit_progress, UnitProgress};
pub use gym::{estimated_one_rep_max, parse_lift, LiftParse, PrTracker, SkipReason};
pub use study::{finished_date, is_finished};
pub use time_totals::{PomodoroTotals, TimeWindows};
