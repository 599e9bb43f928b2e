//! Basketball box score
//!
//! Field goals come from shot-chart rows; the other counting stats come from
//! video tags. Every known player gets a line, even with no rows.

use serde::Serialize;
use std::collections::HashMap;

use crate::storage::types::{BasketballPlayer, Shot, StatType, VideoTag};

/// Points credited for each made shot
pub const POINTS_PER_MADE_SHOT: i64 = 2;

/// One player's line
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct PlayerStats {
    pub player_id: i64,
    pub name: String,
    #[serde(rename = "FGM")]
    pub fgm: i64,
    #[serde(rename = "FGA")]
    pub fga: i64,
    #[serde(rename = "PTS")]
    pub pts: i64,
    #[serde(rename = "AST")]
    pub ast: i64,
    #[serde(rename = "REB")]
    pub reb: i64,
    #[serde(rename = "STL")]
    pub stl: i64,
    #[serde(rename = "BLK")]
    pub blk: i64,
    #[serde(rename = "TOV")]
    pub tov: i64,
}

/// Tally shots and tags into one line per player, in player order
///
/// Rows pointing at unknown players are ignored.
pub fn box_score(
    players: &[BasketballPlayer],
    shots: &[Shot],
    tags: &[VideoTag],
) -> Vec<PlayerStats> {
    let mut lines: Vec<PlayerStats> = players
        .iter()
        .map(|p| PlayerStats {
            player_id: p.id,
            name: p.name.clone(),
            ..Default::default()
        })
        .collect();
    let index: HashMap<i64, usize> = players
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id, i))
        .collect();

    for shot in shots {
        let Some(&i) = index.get(&shot.player_id) else {
            continue;
        };
        lines[i].fga += 1;
        if shot.made {
            lines[i].fgm += 1;
        }
    }

    for tag in tags {
        let Some(&i) = index.get(&tag.player_id) else {
            continue;
        };
        let line = &mut lines[i];
        match tag.stat_type {
            StatType::Ast => line.ast += 1,
            StatType::Reb => line.reb += 1,
            StatType::Stl => line.stl += 1,
            StatType::Blk => line.blk += 1,
            StatType::Tov => line.tov += 1,
            // field goals are counted from the shot chart
            StatType::FgaMade | StatType::FgaMissed => {}
        }
    }

    for line in &mut lines {
        line.pts = line.fgm * POINTS_PER_MADE_SHOT;
    }

    lines
}
