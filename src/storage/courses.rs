//! Courses and their units
//!
//! Progress lives only in `course_unit.is_complete`; course totals are
//! derived every time a course is read.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;

use super::error::{StorageError, StorageResult};
use super::types::{Course, CourseUnit};
use crate::metrics::unit_progress;

const SELECT_COURSES: &str = "SELECT * FROM course ORDER BY id";
const SELECT_COURSE_BY_ID: &str = "SELECT * FROM course WHERE id = ?1";
const INSERT_COURSE: &str = "INSERT INTO course (title, platform, category, target_date, sessions_per_week)
    VALUES (?1, ?2, ?3, ?4, ?5)";

const SELECT_UNITS: &str = "SELECT * FROM course_unit ORDER BY course_id, unit_number";
const SELECT_UNITS_FOR_COURSE: &str =
    "SELECT * FROM course_unit WHERE course_id = ?1 ORDER BY unit_number";
const SELECT_UNIT_BY_ID: &str = "SELECT * FROM course_unit WHERE id = ?1";
const INSERT_NEXT_UNIT: &str = "INSERT INTO course_unit (course_id, unit_number, title, is_complete)
    SELECT ?1, COALESCE(MAX(unit_number), 0) + 1,
           COALESCE(?2, 'Unit ' || (COALESCE(MAX(unit_number), 0) + 1)), ?3
    FROM course_unit WHERE course_id = ?1";
const UPDATE_UNIT: &str = "UPDATE course_unit SET is_complete = ?2 WHERE id = ?1";

/// A validated course to create
#[derive(Debug, Clone, Default)]
pub struct NewCourse {
    pub title: String,
    pub platform: Option<String>,
    pub category: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub sessions_per_week: i64,
    /// Units generated up front
    pub total_units: i64,
    /// How many of the generated units start out complete
    pub completed_units: i64,
}

struct CourseRow {
    id: i64,
    title: String,
    platform: Option<String>,
    category: Option<String>,
    target_date: Option<NaiveDate>,
    sessions_per_week: i64,
}

impl CourseRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            platform: row.get("platform")?,
            category: row.get("category")?,
            target_date: row.get("target_date")?,
            sessions_per_week: row.get("sessions_per_week")?,
        })
    }

    fn with_units(self, units: Vec<CourseUnit>) -> Course {
        let progress = unit_progress(units.iter().map(|u| u.is_complete));
        Course {
            id: self.id,
            title: self.title,
            platform: self.platform,
            category: self.category,
            target_date: self.target_date,
            sessions_per_week: self.sessions_per_week,
            total_units: progress.total,
            completed_units: progress.completed,
            progress: progress.percent(),
            units,
        }
    }
}

pub fn list_courses(conn: &Connection) -> StorageResult<Vec<Course>> {
    let mut stmt = conn.prepare(SELECT_UNITS)?;
    let mut units: HashMap<i64, Vec<CourseUnit>> = HashMap::new();
    for unit in stmt.query_map([], CourseUnit::from_row)? {
        let unit = unit?;
        units.entry(unit.course_id).or_default().push(unit);
    }

    let mut stmt = conn.prepare(SELECT_COURSES)?;
    let courses = stmt
        .query_map([], CourseRow::from_row)?
        .map(|row| row.map(|row| {
            let course_units = units.remove(&row.id).unwrap_or_default();
            row.with_units(course_units)
        }))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(courses)
}

pub fn get_course(conn: &Connection, id: i64) -> StorageResult<Option<Course>> {
    let Some(row) = conn
        .query_row(SELECT_COURSE_BY_ID, [id], CourseRow::from_row)
        .optional()?
    else {
        return Ok(None);
    };

    let mut stmt = conn.prepare(SELECT_UNITS_FOR_COURSE)?;
    let units = stmt
        .query_map([id], CourseUnit::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(row.with_units(units)))
}

fn require_course(conn: &Connection, id: i64) -> StorageResult<Course> {
    get_course(conn, id)?.ok_or_else(|| StorageError::not_found("Course", id))
}

/// Create a course together with its initial units
pub fn create_course(conn: &Connection, course: &NewCourse) -> StorageResult<Course> {
    conn.execute(
        INSERT_COURSE,
        params![
            course.title,
            course.platform,
            course.category,
            course.target_date,
            course.sessions_per_week
        ],
    )?;
    let id = conn.last_insert_rowid();

    let completed = course.completed_units.clamp(0, course.total_units.max(0));
    for n in 0..course.total_units.max(0) {
        conn.execute(INSERT_NEXT_UNIT, params![id, None::<String>, n < completed])?;
    }

    tracing::info!(course_id = id, units = course.total_units, "Created course");
    require_course(conn, id)
}

/// Append one unit to a course
pub fn add_unit(conn: &Connection, course_id: i64, title: Option<&str>) -> StorageResult<CourseUnit> {
    require_course(conn, course_id)?;
    conn.execute(INSERT_NEXT_UNIT, params![course_id, title, false])?;
    Ok(conn.query_row(
        SELECT_UNIT_BY_ID,
        [conn.last_insert_rowid()],
        CourseUnit::from_row,
    )?)
}

/// Flag a unit complete or incomplete
pub fn set_unit_complete(conn: &Connection, id: i64, is_complete: bool) -> StorageResult<CourseUnit> {
    let updated = conn.execute(UPDATE_UNIT, params![id, is_complete])?;
    if updated == 0 {
        return Err(StorageError::not_found("Course unit", id));
    }
    Ok(conn.query_row(SELECT_UNIT_BY_ID, [id], CourseUnit::from_row)?)
}
