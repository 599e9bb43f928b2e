//! Data Transfer Objects
//!
//! Request and response types for the API endpoints.
//! Request fields are optional at the serde level so that a missing field is
//! reported as a validation error naming the field, not a generic parse error.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::api::error::{ApiError, ApiResult};
use crate::metrics::PomodoroTotals;
use crate::storage::{Exam, WeakTopic};

// ============================================
// EXTRACTORS & HELPERS
// ============================================

/// JSON body extractor whose rejections become `ApiError::Validation`
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// Serialize a record, mapping an absent one to `null`
pub fn record_json<T: Serialize>(record: Option<&T>) -> ApiResult<Value> {
    match record {
        Some(record) => serde_json::to_value(record)
            .map_err(|e| ApiError::Internal(format!("Failed to serialize record: {}", e))),
        None => Ok(Value::Null),
    }
}

/// Unwrap a required field
pub fn required<T>(value: Option<T>, field: &str) -> ApiResult<T> {
    value.ok_or_else(|| ApiError::Validation(format!("{} is required", field)))
}

/// Unwrap a required text field, trimmed and non-empty
pub fn required_text(value: Option<String>, field: &str) -> ApiResult<String> {
    let text = required(value, field)?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(format!("{} cannot be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Blank optional text is treated as absent
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Reject negative counters
pub fn non_negative(value: Option<i64>, field: &str) -> ApiResult<Option<i64>> {
    match value {
        Some(v) if v < 0 => Err(ApiError::Validation(format!(
            "{} must not be negative",
            field
        ))),
        other => Ok(other),
    }
}

/// Parse `HH:MM` or `HH:MM:SS`
pub fn parse_time(value: &str, field: &str) -> ApiResult<NaiveTime> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| ApiError::Validation(format!("{} must be HH:MM, got '{}'", field, value)))
}

// ============================================
// STUDY DTOs
// ============================================

#[derive(Debug, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: Option<String>,
}

/// Partial lecture update; omitted fields keep their value
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLectureRequest {
    pub uni_lecs: Option<i64>,
    pub studied: Option<i64>,
    pub revised: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateExamRequest {
    pub name: Option<String>,
    /// YYYY-MM-DD
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMistakeRequest {
    pub topic: Option<String>,
    pub description: Option<String>,
    pub subject_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PomodoroRequest {
    /// Seconds
    pub duration: Option<i64>,
    pub subject_id: Option<i64>,
    /// Lecture number within the subject
    pub lecture_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFlashcardRequest {
    pub subject_id: Option<i64>,
    /// Lecture number within the subject
    pub lecture_id: Option<i64>,
    pub front: Option<String>,
    pub back: Option<String>,
}

/// Dashboard snapshot
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub pomodoro: PomodoroTotals,
    pub exams: Vec<Exam>,
    pub weak_topics: Vec<WeakTopic>,
}

// ============================================
// COURSE DTOs
// ============================================

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub title: Option<String>,
    pub platform: Option<String>,
    pub category: Option<String>,
    pub total_units: Option<i64>,
    pub completed_units: Option<i64>,
    pub target_date: Option<NaiveDate>,
    pub sessions_per_week: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateUnitRequest {
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUnitRequest {
    pub is_complete: Option<bool>,
}

// ============================================
// GYM DTOs
// ============================================

#[derive(Debug, Default, Deserialize)]
pub struct PlannerQuery {
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct PlannedExerciseRequest {
    pub exercise_id: Option<i64>,
    pub sets: Option<String>,
    pub reps: Option<String>,
    pub weight: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePlanRequest {
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub exercises: Option<Vec<PlannedExerciseRequest>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateExerciseRequest {
    pub name: Option<String>,
    pub group: Option<String>,
    pub cues: Option<String>,
    pub tags: Option<Vec<String>>,
}

// ============================================
// BASKETBALL DTOs
// ============================================

#[derive(Debug, Deserialize)]
pub struct CreatePlayerRequest {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub time: Option<f64>,
    pub player_id: Option<i64>,
    pub category: Option<String>,
    pub action: Option<String>,
    pub stat_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateShotRequest {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub made: Option<bool>,
    pub player_id: Option<i64>,
}

// ============================================
// SCHEDULE DTOs
// ============================================

#[derive(Debug, Default, Deserialize)]
pub struct ScheduleQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: Option<String>,
    /// HH:MM
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub color: Option<String>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, unhealthy
    pub status: String,
    /// Database status
    pub database: String,
    /// Open pooled connections
    pub pool_connections: u32,
    /// Idle pooled connections
    pub pool_idle: u32,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Application version
    pub version: String,
}
