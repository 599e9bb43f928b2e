//! Basketball: players, video tags and the shot chart

use rusqlite::{params, Connection, OptionalExtension};

use super::error::{StorageError, StorageResult};
use super::types::{BasketballPlayer, Shot, StatType, VideoTag, VideoTagView};
use crate::metrics::{box_score, PlayerStats};

const SELECT_PLAYERS: &str = "SELECT * FROM basketball_player ORDER BY id";
const SELECT_PLAYER_BY_ID: &str = "SELECT * FROM basketball_player WHERE id = ?1";
const SELECT_PLAYER_BY_NAME: &str = "SELECT * FROM basketball_player WHERE name = ?1";
const INSERT_PLAYER: &str = "INSERT INTO basketball_player (name) VALUES (?1)";

const SELECT_TAGS: &str = "
    SELECT t.*, p.name AS player_name FROM video_tag t
    JOIN basketball_player p ON p.id = t.player_id
    ORDER BY t.time, t.id";
const SELECT_TAG_BY_ID: &str = "SELECT * FROM video_tag WHERE id = ?1";
const INSERT_TAG: &str = "INSERT INTO video_tag (time, player_id, category, action, stat_type)
    VALUES (?1, ?2, ?3, ?4, ?5)";

const SELECT_SHOTS: &str = "SELECT * FROM shot ORDER BY id";
const SELECT_SHOT_BY_ID: &str = "SELECT * FROM shot WHERE id = ?1";
const INSERT_SHOT: &str = "INSERT INTO shot (x, y, made, player_id) VALUES (?1, ?2, ?3, ?4)";

/// A validated video tag to record
#[derive(Debug, Clone)]
pub struct NewTag {
    pub time: f64,
    pub player_id: i64,
    pub category: Option<String>,
    pub action: Option<String>,
    pub stat_type: StatType,
}

/// Everything the basketball page shows at once
#[derive(Debug, Clone, serde::Serialize)]
pub struct BasketballData {
    pub players: Vec<BasketballPlayer>,
    pub tags: Vec<VideoTagView>,
    pub shots: Vec<Shot>,
    pub stats: Vec<PlayerStats>,
}

pub fn list_players(conn: &Connection) -> StorageResult<Vec<BasketballPlayer>> {
    let mut stmt = conn.prepare(SELECT_PLAYERS)?;
    let players = stmt
        .query_map([], BasketballPlayer::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(players)
}

fn require_player(conn: &Connection, id: i64) -> StorageResult<BasketballPlayer> {
    conn.query_row(SELECT_PLAYER_BY_ID, [id], BasketballPlayer::from_row)
        .optional()?
        .ok_or_else(|| StorageError::not_found("Player", id))
}

pub fn create_player(conn: &Connection, name: &str) -> StorageResult<BasketballPlayer> {
    let existing = conn
        .query_row(SELECT_PLAYER_BY_NAME, [name], BasketballPlayer::from_row)
        .optional()?;
    if existing.is_some() {
        return Err(StorageError::Conflict(
            "Player with this name already exists".to_string(),
        ));
    }

    conn.execute(INSERT_PLAYER, [name])?;
    let id = conn.last_insert_rowid();
    tracing::info!(player_id = id, name, "Created player");
    require_player(conn, id)
}

pub fn list_tags(conn: &Connection) -> StorageResult<Vec<VideoTagView>> {
    let mut stmt = conn.prepare(SELECT_TAGS)?;
    let tags = stmt
        .query_map([], |row| {
            Ok(VideoTagView {
                tag: VideoTag::from_row(row)?,
                player_name: row.get("player_name")?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tags)
}

pub fn create_tag(conn: &Connection, tag: &NewTag) -> StorageResult<VideoTag> {
    require_player(conn, tag.player_id)?;
    conn.execute(
        INSERT_TAG,
        params![tag.time, tag.player_id, tag.category, tag.action, tag.stat_type],
    )?;
    Ok(conn.query_row(SELECT_TAG_BY_ID, [conn.last_insert_rowid()], VideoTag::from_row)?)
}

pub fn list_shots(conn: &Connection) -> StorageResult<Vec<Shot>> {
    let mut stmt = conn.prepare(SELECT_SHOTS)?;
    let shots = stmt
        .query_map([], Shot::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(shots)
}

pub fn create_shot(conn: &Connection, x: f64, y: f64, made: bool, player_id: i64) -> StorageResult<Shot> {
    require_player(conn, player_id)?;
    conn.execute(INSERT_SHOT, params![x, y, made, player_id])?;
    Ok(conn.query_row(SELECT_SHOT_BY_ID, [conn.last_insert_rowid()], Shot::from_row)?)
}

/// Players, tags, shots and the box score derived from them
pub fn data(conn: &Connection) -> StorageResult<BasketballData> {
    let players = list_players(conn)?;
    let tags = list_tags(conn)?;
    let shots = list_shots(conn)?;

    let raw_tags: Vec<VideoTag> = tags.iter().map(|view| view.tag.clone()).collect();
    let stats = box_score(&players, &shots, &raw_tags);

    Ok(BasketballData {
        players,
        tags,
        shots,
        stats,
    })
}
