//! Reset Routes
//!
//! - POST /api/reset/:section - Delete every row of one domain

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::storage::reset::{self, ResetSection, ResetSummary};

/// POST /api/reset/:section
///
/// Runs in one transaction; a failure rolls back every delete and surfaces
/// the database message.
pub async fn reset_section(
    State(state): State<Arc<AppState>>,
    Path(section): Path<String>,
) -> ApiResult<Json<ResetSummary>> {
    let section: ResetSection = section.parse().map_err(ApiError::Validation)?;

    let summary = state
        .db
        .write(move |tx| reset::reset_section(tx, section))
        .await?;

    Ok(Json(summary))
}
