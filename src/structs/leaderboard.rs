use crate::models::leaderboard::LeaderboardEntry;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw query strings; numeric values are parsed leniently by the controller.
#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    #[serde(rename = "gameType")]
    pub game_type: Option<String>,
    pub limit: Option<String>,
    pub skip: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardEntryView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub game_type: String,
    pub score: i64,
    pub time_in_seconds: i64,
    pub played_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<String>,
    pub is_guest: bool,
}

impl From<LeaderboardEntry> for LeaderboardEntryView {
    fn from(entry: LeaderboardEntry) -> Self {
        LeaderboardEntryView {
            id: entry.id.map(|id| id.to_hex()),
            game_type: entry.game_type.to_string(),
            score: entry.score,
            time_in_seconds: entry.time_in_seconds,
            played_at: entry.played_at,
            user_id: entry.user_id,
            username: entry.username,
            guest_id: entry.guest_id,
            is_guest: entry.is_guest,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub leaderboard: Vec<LeaderboardEntryView>,
    pub total: u64,
    pub game_type: String,
}
