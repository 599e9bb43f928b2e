//! Basketball Routes
//!
//! - POST /api/basketball/players - Add a player
//! - GET /api/basketball/data - Players, tags, shots and box score
//! - POST /api/basketball/tags - Tag a video event
//! - POST /api/basketball/shots - Record a shot

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::{
    optional_text, required, required_text, ApiJson, CreatePlayerRequest, CreateShotRequest,
    CreateTagRequest,
};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::storage::basketball::{self, BasketballData, NewTag};
use crate::storage::schema::DEFAULT_PLAYER_ID;
use crate::storage::{BasketballPlayer, Shot, StatType, VideoTag};

/// POST /api/basketball/players
pub async fn create_player(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreatePlayerRequest>,
) -> ApiResult<(StatusCode, Json<BasketballPlayer>)> {
    let name = required_text(req.name, "name")?;

    let player = state
        .db
        .write(move |tx| basketball::create_player(tx, &name))
        .await?;

    Ok((StatusCode::CREATED, Json(player)))
}

/// GET /api/basketball/data
///
/// Everything the basketball view needs, box score included.
pub async fn get_data(State(state): State<Arc<AppState>>) -> ApiResult<Json<BasketballData>> {
    let data = state.db.read(basketball::data).await?;
    Ok(Json(data))
}

/// POST /api/basketball/tags
pub async fn create_tag(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateTagRequest>,
) -> ApiResult<(StatusCode, Json<VideoTag>)> {
    let time = required(req.time, "time")?;
    if !time.is_finite() || time < 0.0 {
        return Err(ApiError::Validation(
            "time must be a non-negative number of seconds".to_string(),
        ));
    }
    let stat_type: StatType = required_text(req.stat_type, "stat_type")?
        .parse()
        .map_err(ApiError::Validation)?;

    let tag = NewTag {
        time,
        player_id: required(req.player_id, "player_id")?,
        category: optional_text(req.category),
        action: optional_text(req.action),
        stat_type,
    };

    let created = state
        .db
        .write(move |tx| basketball::create_tag(tx, &tag))
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /api/basketball/shots
///
/// `player_id` defaults to the default player.
pub async fn create_shot(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateShotRequest>,
) -> ApiResult<(StatusCode, Json<Shot>)> {
    let x = required(req.x, "x")?;
    let y = required(req.y, "y")?;
    let made = required(req.made, "made")?;
    let player_id = req.player_id.unwrap_or(DEFAULT_PLAYER_ID);

    let shot = state
        .db
        .write(move |tx| basketball::create_shot(tx, x, y, made, player_id))
        .await?;

    Ok((StatusCode::CREATED, Json(shot)))
}
