//! Gym: exercise catalog, weekly plans and personal records.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;

use super::error::{StorageError, StorageResult};
use super::types::{
    Exercise, GymPlan, GymPlanExercise, PersonalRecord, PersonalRecordView, PlannerDay,
};
use crate::metrics::{parse_lift, LiftParse, PrTracker};

const SELECT_EXERCISES: &str = "SELECT * FROM exercise ORDER BY name";
const SELECT_EXERCISE_BY_ID: &str = "SELECT * FROM exercise WHERE id = ?1";
const SELECT_EXERCISE_BY_NAME: &str = "SELECT * FROM exercise WHERE name = ?1";
const INSERT_EXERCISE: &str =
    "INSERT INTO exercise (name, muscle_group, cues, tags) VALUES (?1, ?2, ?3, ?4)";

const SELECT_PRS: &str = "
    SELECT p.*, e.name AS exercise_name FROM pr p
    JOIN exercise e ON e.id = p.exercise_id
    ORDER BY p.date DESC, p.id DESC";
const SELECT_PR_LIFTS: &str = "SELECT exercise_id, weight, reps FROM pr";
const SELECT_PR_BY_ID: &str = "SELECT * FROM pr WHERE id = ?1";
const INSERT_PR: &str = "INSERT INTO pr (exercise_id, weight, reps, date) VALUES (?1, ?2, ?3, ?4)";

const SELECT_PLAN_BY_ID: &str = "SELECT * FROM gym_plan WHERE id = ?1";
const SELECT_PLAN_BY_DATE: &str = "SELECT * FROM gym_plan WHERE plan_date = ?1";
const SELECT_PLANS_BETWEEN: &str =
    "SELECT * FROM gym_plan WHERE plan_date >= ?1 AND plan_date <= ?2 ORDER BY plan_date";
const INSERT_PLAN: &str = "INSERT INTO gym_plan (plan_date, title, notes) VALUES (?1, ?2, ?3)";
const UPDATE_PLAN: &str = "UPDATE gym_plan SET title = ?2, notes = ?3 WHERE id = ?1";
const COMPLETE_PLAN: &str =
    "UPDATE gym_plan SET is_completed = 1, completed_at = ?2 WHERE id = ?1";

const SELECT_PLAN_EXERCISES: &str = "
    SELECT pe.*, e.name AS exercise_name FROM gym_plan_exercise pe
    JOIN exercise e ON e.id = pe.exercise_id
    WHERE pe.plan_id = ?1
    ORDER BY pe.position, pe.id";
const INSERT_PLAN_EXERCISE: &str = "INSERT INTO gym_plan_exercise
    (plan_id, exercise_id, position, sets, reps, weight) VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const DELETE_PLAN_EXERCISES: &str = "DELETE FROM gym_plan_exercise WHERE plan_id = ?1";

/// A validated catalog entry to create
#[derive(Debug, Clone, Default)]
pub struct NewExercise {
    pub name: String,
    pub muscle_group: Option<String>,
    pub cues: Option<String>,
    pub tags: Vec<String>,
}

/// One planned exercise as submitted by the planner
#[derive(Debug, Clone, Default)]
pub struct PlannedExercise {
    pub exercise_id: i64,
    pub sets: Option<String>,
    pub reps: Option<String>,
    pub weight: Option<String>,
}

/// Create-or-update of the plan for one day
///
/// `None` fields keep their stored value; `exercises: Some(..)` replaces the
/// whole exercise list.
#[derive(Debug, Clone)]
pub struct PlanUpsert {
    pub date: NaiveDate,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub exercises: Option<Vec<PlannedExercise>>,
}

/// Result of marking a plan complete
#[derive(Debug, Clone, serde::Serialize)]
pub struct PlanCompletion {
    pub plan: GymPlan,
    pub new_prs: Vec<PersonalRecord>,
}

// ============================================
// EXERCISES & PRS
// ============================================

pub fn list_exercises(conn: &Connection) -> StorageResult<Vec<Exercise>> {
    let mut stmt = conn.prepare(SELECT_EXERCISES)?;
    let exercises = stmt
        .query_map([], Exercise::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(exercises)
}

fn require_exercise(conn: &Connection, id: i64) -> StorageResult<Exercise> {
    conn.query_row(SELECT_EXERCISE_BY_ID, [id], Exercise::from_row)
        .optional()?
        .ok_or_else(|| StorageError::not_found("Exercise", id))
}

pub fn create_exercise(conn: &Connection, exercise: &NewExercise) -> StorageResult<Exercise> {
    let existing = conn
        .query_row(SELECT_EXERCISE_BY_NAME, [&exercise.name], Exercise::from_row)
        .optional()?;
    if existing.is_some() {
        return Err(StorageError::Conflict(
            "Exercise with this name already exists".to_string(),
        ));
    }

    let tags = serde_json::to_string(&exercise.tags)?;
    conn.execute(
        INSERT_EXERCISE,
        params![exercise.name, exercise.muscle_group, exercise.cues, tags],
    )?;
    let id = conn.last_insert_rowid();
    tracing::info!(exercise_id = id, name = %exercise.name, "Created exercise");

    require_exercise(conn, id)
}

pub fn list_prs(conn: &Connection) -> StorageResult<Vec<PersonalRecordView>> {
    let mut stmt = conn.prepare(SELECT_PRS)?;
    let prs = stmt
        .query_map([], |row| {
            Ok(PersonalRecordView {
                record: PersonalRecord::from_row(row)?,
                exercise_name: row.get("exercise_name")?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(prs)
}

// ============================================
// PLANS
// ============================================

fn attach_exercises(conn: &Connection, mut plan: GymPlan) -> StorageResult<GymPlan> {
    let mut stmt = conn.prepare(SELECT_PLAN_EXERCISES)?;
    plan.exercises = stmt
        .query_map([plan.id], GymPlanExercise::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(plan)
}

pub fn get_plan(conn: &Connection, id: i64) -> StorageResult<Option<GymPlan>> {
    match conn
        .query_row(SELECT_PLAN_BY_ID, [id], GymPlan::from_row)
        .optional()?
    {
        Some(plan) => Ok(Some(attach_exercises(conn, plan)?)),
        None => Ok(None),
    }
}

fn require_plan(conn: &Connection, id: i64) -> StorageResult<GymPlan> {
    get_plan(conn, id)?.ok_or_else(|| StorageError::not_found("Gym plan", id))
}

/// Plans dated within `[from, to]`, with exercises
pub fn plans_between(conn: &Connection, from: NaiveDate, to: NaiveDate) -> StorageResult<Vec<GymPlan>> {
    let mut stmt = conn.prepare(SELECT_PLANS_BETWEEN)?;
    let plans = stmt
        .query_map(params![from, to], GymPlan::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    plans
        .into_iter()
        .map(|plan| attach_exercises(conn, plan))
        .collect()
}

/// Seven consecutive days starting at `start`, each with its plan if any
///
/// Stops early at the end of the representable calendar.
pub fn planner_week(conn: &Connection, start: NaiveDate) -> StorageResult<Vec<PlannerDay>> {
    let dates: Vec<NaiveDate> = start.iter_days().take(7).collect();
    let end = dates.last().copied().unwrap_or(start);
    let mut by_date: HashMap<NaiveDate, GymPlan> = plans_between(conn, start, end)?
        .into_iter()
        .map(|plan| (plan.plan_date, plan))
        .collect();

    Ok(dates
        .into_iter()
        .map(|date| PlannerDay {
            date,
            plan: by_date.remove(&date),
        })
        .collect())
}

/// Create the day's plan or update the existing one
pub fn upsert_plan(conn: &Connection, upsert: &PlanUpsert) -> StorageResult<GymPlan> {
    if let Some(exercises) = &upsert.exercises {
        for planned in exercises {
            require_exercise(conn, planned.exercise_id)?;
        }
    }

    let existing = conn
        .query_row(SELECT_PLAN_BY_DATE, [upsert.date], GymPlan::from_row)
        .optional()?;

    let plan_id = match existing {
        Some(plan) => {
            let title = upsert.title.clone().or(plan.title);
            let notes = upsert.notes.clone().or(plan.notes);
            conn.execute(UPDATE_PLAN, params![plan.id, title, notes])?;
            plan.id
        }
        None => {
            conn.execute(INSERT_PLAN, params![upsert.date, upsert.title, upsert.notes])?;
            let id = conn.last_insert_rowid();
            tracing::info!(plan_id = id, date = %upsert.date, "Created gym plan");
            id
        }
    };

    if let Some(exercises) = &upsert.exercises {
        conn.execute(DELETE_PLAN_EXERCISES, [plan_id])?;
        for (position, planned) in exercises.iter().enumerate() {
            conn.execute(
                INSERT_PLAN_EXERCISE,
                params![
                    plan_id,
                    planned.exercise_id,
                    position as i64,
                    planned.sets,
                    planned.reps,
                    planned.weight
                ],
            )?;
        }
    }

    require_plan(conn, plan_id)
}

/// Mark a plan complete and record any new personal records
///
/// Entries whose weight or reps do not parse are skipped. A PR row is
/// inserted only when its estimated one-rep max strictly beats every earlier
/// record for the exercise, including ones added earlier in this call.
pub fn complete_plan(
    conn: &Connection,
    id: i64,
    now: NaiveDateTime,
) -> StorageResult<PlanCompletion> {
    let plan = require_plan(conn, id)?;
    conn.execute(COMPLETE_PLAN, params![id, now])?;

    let mut stmt = conn.prepare(SELECT_PR_LIFTS)?;
    let existing = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<Result<Vec<(i64, f64, i64)>, _>>()?;
    let mut tracker = PrTracker::from_records(existing);

    let mut new_prs = Vec::new();
    for planned in &plan.exercises {
        let (weight, reps) = match parse_lift(planned.weight.as_deref(), planned.reps.as_deref()) {
            LiftParse::Parsed { weight, reps } => (weight, reps),
            LiftParse::Skipped(reason) => {
                tracing::debug!(plan_id = id, exercise_id = planned.exercise_id, ?reason, "Skipping entry");
                continue;
            }
        };

        if tracker.consider(planned.exercise_id, weight, reps) {
            conn.execute(
                INSERT_PR,
                params![planned.exercise_id, weight, reps, now.date()],
            )?;
            let record = conn.query_row(
                SELECT_PR_BY_ID,
                [conn.last_insert_rowid()],
                PersonalRecord::from_row,
            )?;
            tracing::info!(
                exercise_id = planned.exercise_id,
                weight,
                reps,
                "New personal record"
            );
            new_prs.push(record);
        }
    }

    Ok(PlanCompletion {
        plan: require_plan(conn, id)?,
        new_prs,
    })
}
