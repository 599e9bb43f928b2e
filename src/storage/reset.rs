//! Bulk deletion of one tracked domain
//!
//! Tables are cleared children first so foreign keys never dangle. Callers run
//! this inside a single write transaction; any failure rolls back every delete.

use rusqlite::Connection;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::error::StorageResult;
use super::schema;

/// Domain that can be wiped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResetSection {
    Subjects,
    Courses,
    Gym,
    Basketball,
}

impl ResetSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResetSection::Subjects => "subjects",
            ResetSection::Courses => "courses",
            ResetSection::Gym => "gym",
            ResetSection::Basketball => "basketball",
        }
    }

    /// Tables to clear, in deletion order
    fn tables(&self) -> &'static [&'static str] {
        match self {
            ResetSection::Subjects => &["pomodoro_log", "flashcard", "mistake", "lecture", "subject"],
            ResetSection::Courses => &["course_unit", "course"],
            ResetSection::Gym => &["pr", "gym_plan_exercise", "gym_plan", "exercise"],
            ResetSection::Basketball => &["shot", "video_tag", "basketball_player"],
        }
    }
}

impl fmt::Display for ResetSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResetSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "subjects" => Ok(ResetSection::Subjects),
            "courses" => Ok(ResetSection::Courses),
            "gym" => Ok(ResetSection::Gym),
            "basketball" => Ok(ResetSection::Basketball),
            other => Err(format!(
                "Unknown section: {}. Use subjects, courses, gym or basketball",
                other
            )),
        }
    }
}

/// Outcome of a reset
#[derive(Debug, Clone, Serialize)]
pub struct ResetSummary {
    pub section: ResetSection,
    /// Rows removed across all of the section's tables
    pub deleted: usize,
}

/// Delete every row of a section
///
/// A basketball reset recreates the default player afterwards.
pub fn reset_section(conn: &Connection, section: ResetSection) -> StorageResult<ResetSummary> {
    let mut deleted = 0;
    for table in section.tables() {
        let rows = conn.execute(&format!("DELETE FROM {table}"), [])?;
        tracing::debug!(table, rows, "Cleared table");
        deleted += rows;
    }

    if section == ResetSection::Basketball {
        schema::ensure_default_player(conn)?;
    }

    tracing::info!(%section, deleted, "Section reset");
    Ok(ResetSummary { section, deleted })
}
