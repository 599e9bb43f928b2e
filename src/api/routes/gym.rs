//! Gym Routes
//!
//! - GET /api/gym/planner - Seven-day planner view
//! - PUT /api/gym/planner - Create or update the plan for a day
//! - PUT /api/gym/plan/:id/complete - Complete a plan, detecting new PRs
//! - GET /api/gym/exercises - Exercise catalog
//! - POST /api/gym/exercises - Add an exercise
//! - GET /api/gym/prs - Personal records

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Duration;
use std::sync::Arc;

use super::{monday_of, now_utc, today_utc};
use crate::api::dto::{
    optional_text, required, required_text, ApiJson, CreateExerciseRequest, PlannerQuery,
    UpdatePlanRequest,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::storage::gym::{self, NewExercise, PlanCompletion, PlanUpsert, PlannedExercise};
use crate::storage::{Exercise, GymPlan, PersonalRecordView, PlannerDay};

// ============================================
// PLANNER
// ============================================

/// GET /api/gym/planner
///
/// Defaults to the week starting this Monday.
pub async fn get_planner(
    State(state): State<Arc<AppState>>,
    query: Result<Query<PlannerQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PlannerDay>>> {
    let Query(query) = query?;
    let start = query.start_date.unwrap_or_else(|| monday_of(today_utc()));
    if start.checked_add_signed(Duration::days(6)).is_none() {
        return Err(ApiError::Validation(format!(
            "start_date {} leaves no room for a full week",
            start
        )));
    }

    let week = state
        .db
        .read(move |conn| gym::planner_week(conn, start))
        .await?;
    Ok(Json(week))
}

/// PUT /api/gym/planner
///
/// Upsert the plan for `date`. A given `exercises` list replaces the stored
/// one; omitted fields keep their value.
pub async fn update_planner(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<UpdatePlanRequest>,
) -> ApiResult<Json<GymPlan>> {
    let date = required(req.date, "date")?;

    let exercises = match req.exercises {
        Some(entries) => Some(
            entries
                .into_iter()
                .map(|entry| {
                    Ok(PlannedExercise {
                        exercise_id: required(entry.exercise_id, "exercises[].exercise_id")?,
                        sets: optional_text(entry.sets),
                        reps: optional_text(entry.reps),
                        weight: optional_text(entry.weight),
                    })
                })
                .collect::<ApiResult<Vec<_>>>()?,
        ),
        None => None,
    };

    let upsert = PlanUpsert {
        date,
        title: optional_text(req.title),
        notes: req.notes,
        exercises,
    };

    let plan = state
        .db
        .write(move |tx| gym::upsert_plan(tx, &upsert))
        .await?;

    Ok(Json(plan))
}

/// PUT /api/gym/plan/:id/complete
pub async fn complete_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<PlanCompletion>> {
    let now = now_utc();

    let completion = state
        .db
        .write(move |tx| gym::complete_plan(tx, id, now))
        .await?;

    tracing::info!(
        plan_id = id,
        new_prs = completion.new_prs.len(),
        "Completed gym plan"
    );
    Ok(Json(completion))
}

// ============================================
// EXERCISES & PRS
// ============================================

/// GET /api/gym/exercises
pub async fn list_exercises(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Exercise>>> {
    let exercises = state.db.read(gym::list_exercises).await?;
    Ok(Json(exercises))
}

/// POST /api/gym/exercises
pub async fn create_exercise(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateExerciseRequest>,
) -> ApiResult<(StatusCode, Json<Exercise>)> {
    let exercise = NewExercise {
        name: required_text(req.name, "name")?,
        muscle_group: optional_text(req.group),
        cues: optional_text(req.cues),
        tags: req
            .tags
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tag| optional_text(Some(tag)))
            .collect(),
    };

    let created = state
        .db
        .write(move |tx| gym::create_exercise(tx, &exercise))
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/gym/prs
pub async fn list_prs(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PersonalRecordView>>> {
    let prs = state.db.read(gym::list_prs).await?;
    Ok(Json(prs))
}
