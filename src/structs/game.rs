use crate::models::game::GameResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /game/record`. `played_at` is never read from the client.
#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    pub game_type: String,
    pub score: i64,
    pub time_in_seconds: i64,
}

#[derive(Debug, Deserialize)]
pub struct RecordsQuery {
    #[serde(rename = "gameType")]
    pub game_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GameRecordView {
    pub game_type: String,
    pub score: i64,
    pub time_in_seconds: i64,
    pub played_at: DateTime<Utc>,
}

impl From<GameResult> for GameRecordView {
    fn from(result: GameResult) -> Self {
        GameRecordView {
            game_type: result.game_type.to_string(),
            score: result.score,
            time_in_seconds: result.time_in_seconds,
            played_at: result.played_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordsResponse {
    pub records: Vec<GameRecordView>,
}
