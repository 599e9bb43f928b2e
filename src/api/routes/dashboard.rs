//! Dashboard Routes
//!
//! - GET /api/dashboard_metrics - Pomodoro totals, exams and weak topics

use axum::{extract::State, Json};
use std::sync::Arc;

use super::now_utc;
use crate::api::dto::DashboardResponse;
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::metrics::TimeWindows;
use crate::storage::study;

/// How many recent mistakes the dashboard lists
const WEAK_TOPIC_LIMIT: usize = 5;

/// GET /api/dashboard_metrics
///
/// Aggregate snapshot for the landing view. Totals are zero when nothing has
/// been logged.
pub async fn dashboard_metrics(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<DashboardResponse>> {
    let windows = TimeWindows::at(now_utc());

    let response = state
        .db
        .read(move |conn| {
            Ok(DashboardResponse {
                pomodoro: study::pomodoro_totals(conn, &windows)?,
                exams: study::list_exams(conn)?,
                weak_topics: study::weak_topics(conn, WEAK_TOPIC_LIMIT)?,
            })
        })
        .await?;

    Ok(Json(response))
}
