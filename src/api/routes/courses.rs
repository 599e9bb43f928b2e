//! Course Routes
//!
//! - GET /api/courses - Courses with derived unit counts
//! - POST /api/courses - Create a course and its units
//! - GET /api/courses/:id - One course, or null
//! - POST /api/courses/:id/units - Append a unit
//! - PUT /api/course_units/:id - Mark a unit complete or incomplete

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use crate::api::dto::{
    non_negative, optional_text, record_json, required, required_text, ApiJson,
    CreateCourseRequest, CreateUnitRequest, UpdateUnitRequest,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::storage::courses::{self, NewCourse};
use crate::storage::{Course, CourseUnit};

/// GET /api/courses
pub async fn list_courses(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Course>>> {
    let courses = state.db.read(courses::list_courses).await?;
    Ok(Json(courses))
}

/// GET /api/courses/:id
///
/// Responds with `null` when the course does not exist.
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let course = state
        .db
        .read(move |conn| courses::get_course(conn, id))
        .await?;
    Ok(Json(record_json(course.as_ref())?))
}

/// Upper bound on units generated by one create request
pub const MAX_COURSE_UNITS: i64 = 1000;

/// POST /api/courses
///
/// Create a course with `total_units` generated units, the first
/// `completed_units` of them already complete.
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateCourseRequest>,
) -> ApiResult<(StatusCode, Json<Course>)> {
    let title = required_text(req.title, "title")?;
    let sessions_per_week = non_negative(req.sessions_per_week, "sessions_per_week")?.unwrap_or(1);
    let total_units = non_negative(req.total_units, "total_units")?.unwrap_or(0);
    if total_units > MAX_COURSE_UNITS {
        return Err(ApiError::Validation(format!(
            "total_units must be at most {}",
            MAX_COURSE_UNITS
        )));
    }

    let course = NewCourse {
        title,
        platform: optional_text(req.platform),
        category: optional_text(req.category),
        target_date: req.target_date,
        sessions_per_week,
        total_units,
        completed_units: non_negative(req.completed_units, "completed_units")?.unwrap_or(0),
    };

    let created = state
        .db
        .write(move |tx| courses::create_course(tx, &course))
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /api/courses/:id/units
///
/// The body is optional; without a title the unit is named after its number.
pub async fn add_unit(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<i64>,
    body: Option<ApiJson<CreateUnitRequest>>,
) -> ApiResult<(StatusCode, Json<CourseUnit>)> {
    let title = body.and_then(|ApiJson(req)| optional_text(req.title));

    let unit = state
        .db
        .write(move |tx| courses::add_unit(tx, course_id, title.as_deref()))
        .await?;

    Ok((StatusCode::CREATED, Json(unit)))
}

/// PUT /api/course_units/:id
pub async fn update_unit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<UpdateUnitRequest>,
) -> ApiResult<Json<CourseUnit>> {
    let is_complete = required(req.is_complete, "is_complete")?;

    let unit = state
        .db
        .write(move |tx| courses::set_unit_complete(tx, id, is_complete))
        .await?;

    if unit.is_complete {
        tracing::info!(unit_id = id, course_id = unit.course_id, "Unit completed");
    }
    Ok(Json(unit))
}
