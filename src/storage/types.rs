//! Row types for every tracked domain
//!
//! Each type derives `Serialize`, which is how records reach the wire:
//! chrono dates render as `YYYY-MM-DD`, times as `HH:MM:SS` and timestamps as
//! ISO-8601 text.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::types::{
    FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Type, ValueRef,
};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================
// STUDY
// ============================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Subject {
    pub id: i64,
    pub name: String,
}

impl Subject {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
        })
    }
}

/// Subject together with its lectures, ordered by lecture number
#[derive(Debug, Clone, Serialize)]
pub struct SubjectWithLectures {
    #[serde(flatten)]
    pub subject: Subject,
    pub lectures: Vec<Lecture>,
}

/// One lecture of a subject and its study progress
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Lecture {
    pub id: i64,
    pub subject_id: i64,
    pub lecture_number: i64,
    /// Number of university lectures this entry covers
    pub uni_lecs: i64,
    /// How many of them have been studied
    pub studied: i64,
    pub revised: bool,
    /// Cumulative pomodoro time in seconds
    pub total_time: i64,
    /// Number of pomodoro sessions logged against the lecture
    pub sessions: i64,
    pub finished_date: Option<NaiveDate>,
}

impl Lecture {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            subject_id: row.get("subject_id")?,
            lecture_number: row.get("lecture_number")?,
            uni_lecs: row.get("uni_lecs")?,
            studied: row.get("studied")?,
            revised: row.get("revised")?,
            total_time: row.get("total_time")?,
            sessions: row.get("sessions")?,
            finished_date: row.get("finished_date")?,
        })
    }
}

/// Flashcard keyed by subject and lecture *number*
#[derive(Debug, Clone, Serialize)]
pub struct Flashcard {
    pub id: i64,
    pub subject_id: i64,
    pub lecture_id: i64,
    pub front: String,
    pub back: String,
}

impl Flashcard {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            subject_id: row.get("subject_id")?,
            lecture_id: row.get("lecture_id")?,
            front: row.get("front")?,
            back: row.get("back")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Exam {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
}

impl Exam {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            date: row.get("date")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Mistake {
    pub id: i64,
    pub topic: String,
    pub description: Option<String>,
    pub subject_id: i64,
}

impl Mistake {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            topic: row.get("topic")?,
            description: row.get("description")?,
            subject_id: row.get("subject_id")?,
        })
    }
}

/// Mistake joined with the name of its subject
#[derive(Debug, Clone, Serialize)]
pub struct MistakeView {
    #[serde(flatten)]
    pub mistake: Mistake,
    pub subject_name: String,
}

/// Dashboard entry for a recently logged mistake
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeakTopic {
    pub topic: String,
    pub subject_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PomodoroLog {
    pub id: i64,
    /// UTC timestamp of the session
    pub logged_at: NaiveDateTime,
    /// Length in seconds
    pub duration: i64,
    pub subject_id: Option<i64>,
    /// Lecture number within the subject
    pub lecture_id: Option<i64>,
}

impl PomodoroLog {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            logged_at: row.get("logged_at")?,
            duration: row.get("duration")?,
            subject_id: row.get("subject_id")?,
            lecture_id: row.get("lecture_id")?,
        })
    }
}

// ============================================
// COURSES
// ============================================

/// Course with unit counts derived from its `course_unit` rows
#[derive(Debug, Clone, Serialize)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub platform: Option<String>,
    pub category: Option<String>,
    pub target_date: Option<NaiveDate>,
    pub sessions_per_week: i64,
    pub total_units: i64,
    pub completed_units: i64,
    /// Completed share in percent, 0 when the course has no units
    pub progress: f64,
    pub units: Vec<CourseUnit>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CourseUnit {
    pub id: i64,
    pub course_id: i64,
    pub unit_number: i64,
    pub title: String,
    pub is_complete: bool,
}

impl CourseUnit {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            course_id: row.get("course_id")?,
            unit_number: row.get("unit_number")?,
            title: row.get("title")?,
            is_complete: row.get("is_complete")?,
        })
    }
}

// ============================================
// SCHEDULE
// ============================================

#[derive(Debug, Clone, Serialize)]
pub struct CustomEvent {
    pub id: i64,
    pub title: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub event_date: NaiveDate,
    pub color: String,
}

impl CustomEvent {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            start_time: row.get("start_time")?,
            end_time: row.get("end_time")?,
            event_date: row.get("event_date")?,
            color: row.get("color")?,
        })
    }
}

/// One item on a day's schedule
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleEntry {
    Event(CustomEvent),
    Gym(GymPlan),
}

// ============================================
// GYM
// ============================================

#[derive(Debug, Clone, Serialize)]
pub struct Exercise {
    pub id: i64,
    pub name: String,
    #[serde(rename = "group")]
    pub muscle_group: Option<String>,
    pub cues: Option<String>,
    pub tags: Vec<String>,
}

impl Exercise {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let raw: String = row.get("tags")?;
        let tags = serde_json::from_str(&raw).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                row.as_ref().column_index("tags").unwrap_or_default(),
                Type::Text,
                Box::new(e),
            )
        })?;
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            muscle_group: row.get("muscle_group")?,
            cues: row.get("cues")?,
            tags,
        })
    }
}

/// Best recorded lift for an exercise at a point in time
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PersonalRecord {
    pub id: i64,
    pub exercise_id: i64,
    pub weight: f64,
    pub reps: i64,
    pub date: NaiveDate,
}

impl PersonalRecord {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            exercise_id: row.get("exercise_id")?,
            weight: row.get("weight")?,
            reps: row.get("reps")?,
            date: row.get("date")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonalRecordView {
    #[serde(flatten)]
    pub record: PersonalRecord,
    pub exercise_name: String,
}

/// A day's training plan
#[derive(Debug, Clone, Serialize)]
pub struct GymPlan {
    pub id: i64,
    pub plan_date: NaiveDate,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub is_completed: bool,
    pub completed_at: Option<NaiveDateTime>,
    pub exercises: Vec<GymPlanExercise>,
}

impl GymPlan {
    /// Build from a `gym_plan` row; exercises are attached by the caller
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            plan_date: row.get("plan_date")?,
            title: row.get("title")?,
            notes: row.get("notes")?,
            is_completed: row.get("is_completed")?,
            completed_at: row.get("completed_at")?,
            exercises: Vec::new(),
        })
    }
}

/// Planned work for one exercise; the numbers are free text ("8-12")
#[derive(Debug, Clone, Serialize)]
pub struct GymPlanExercise {
    pub id: i64,
    pub plan_id: i64,
    pub exercise_id: i64,
    pub exercise_name: String,
    pub position: i64,
    pub sets: Option<String>,
    pub reps: Option<String>,
    pub weight: Option<String>,
}

impl GymPlanExercise {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            plan_id: row.get("plan_id")?,
            exercise_id: row.get("exercise_id")?,
            exercise_name: row.get("exercise_name")?,
            position: row.get("position")?,
            sets: row.get("sets")?,
            reps: row.get("reps")?,
            weight: row.get("weight")?,
        })
    }
}

/// One day of the weekly planner view
#[derive(Debug, Clone, Serialize)]
pub struct PlannerDay {
    pub date: NaiveDate,
    pub plan: Option<GymPlan>,
}

// ============================================
// BASKETBALL
// ============================================

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BasketballPlayer {
    pub id: i64,
    pub name: String,
}

impl BasketballPlayer {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
        })
    }
}

/// Kind of event a video tag records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatType {
    FgaMade,
    FgaMissed,
    Ast,
    Reb,
    Stl,
    Blk,
    Tov,
}

impl StatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatType::FgaMade => "fga_made",
            StatType::FgaMissed => "fga_missed",
            StatType::Ast => "ast",
            StatType::Reb => "reb",
            StatType::Stl => "stl",
            StatType::Blk => "blk",
            StatType::Tov => "tov",
        }
    }
}

impl fmt::Display for StatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fga_made" => Ok(StatType::FgaMade),
            "fga_missed" => Ok(StatType::FgaMissed),
            "ast" => Ok(StatType::Ast),
            "reb" => Ok(StatType::Reb),
            "stl" => Ok(StatType::Stl),
            "blk" => Ok(StatType::Blk),
            "tov" => Ok(StatType::Tov),
            other => Err(format!(
                "Invalid stat_type: {}. Use fga_made, fga_missed, ast, reb, stl, blk or tov",
                other
            )),
        }
    }
}

impl ToSql for StatType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for StatType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        raw.parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// Timestamped event from game footage
#[derive(Debug, Clone, Serialize)]
pub struct VideoTag {
    pub id: i64,
    /// Seconds into the video
    pub time: f64,
    pub player_id: i64,
    pub category: Option<String>,
    pub action: Option<String>,
    pub stat_type: StatType,
}

impl VideoTag {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            time: row.get("time")?,
            player_id: row.get("player_id")?,
            category: row.get("category")?,
            action: row.get("action")?,
            stat_type: row.get("stat_type")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoTagView {
    #[serde(flatten)]
    pub tag: VideoTag,
    pub player_name: String,
}

/// Field-goal attempt at court coordinates
#[derive(Debug, Clone, Serialize)]
pub struct Shot {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    pub made: bool,
    pub player_id: i64,
}

impl Shot {
    pub(crate) fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            x: row.get("x")?,
            y: row.get("y")?,
            made: row.get("made")?,
            player_id: row.get("player_id")?,
        })
    }
}
