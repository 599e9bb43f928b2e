//! Schedule Routes
//!
//! - GET /api/schedule - Entries for a day (events and the gym plan)
//! - POST /api/schedule - Create a custom event

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::today_utc;
use crate::api::dto::{
    optional_text, parse_time, required, required_text, ApiJson, CreateEventRequest,
    ScheduleQuery,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::storage::schedule::{self, NewEvent};
use crate::storage::{CustomEvent, ScheduleEntry};

/// GET /api/schedule
///
/// Defaults to today.
pub async fn get_schedule(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ScheduleQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<ScheduleEntry>>> {
    let Query(query) = query?;
    let date = query.date.unwrap_or_else(today_utc);

    let entries = state
        .db
        .read(move |conn| schedule::entries_for(conn, date))
        .await?;
    Ok(Json(entries))
}

/// POST /api/schedule
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateEventRequest>,
) -> ApiResult<(StatusCode, Json<CustomEvent>)> {
    let title = required_text(req.title, "title")?;
    let start_time = parse_time(&required(req.start_time, "start_time")?, "start_time")?;
    let end_time = parse_time(&required(req.end_time, "end_time")?, "end_time")?;
    if end_time < start_time {
        return Err(ApiError::Validation(
            "end_time must not be before start_time".to_string(),
        ));
    }

    let event = NewEvent {
        title,
        start_time,
        end_time,
        event_date: req.event_date.unwrap_or_else(today_utc),
        color: optional_text(req.color),
    };

    let created = state
        .db
        .write(move |tx| schedule::create_event(tx, &event))
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}
