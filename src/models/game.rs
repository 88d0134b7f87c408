use crate::errors::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    #[default]
    Normal,
    Infinite,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Normal => "normal",
            GameType::Infinite => "infinite",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "normal" => Ok(GameType::Normal),
            "infinite" => Ok(GameType::Infinite),
            _ => Err(AppError::validation("Game type must be normal or infinite")),
        }
    }
}

/// One finished game. Embedded in user documents as `game_records`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GameResult {
    pub game_type: GameType,
    pub score: i64,
    pub time_in_seconds: i64,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub played_at: DateTime<Utc>,
}

impl GameResult {
    /// Builds a result stamped with the server clock.
    pub fn new(game_type: &str, score: i64, time_in_seconds: i64) -> Result<Self, AppError> {
        Self::played_at(game_type, score, time_in_seconds, Utc::now())
    }

    pub fn played_at(
        game_type: &str,
        score: i64,
        time_in_seconds: i64,
        played_at: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let game_type = game_type.parse::<GameType>()?;

        if score < 0 || time_in_seconds < 0 {
            return Err(AppError::validation(
                "Score and time_in_seconds must be non-negative",
            ));
        }

        Ok(GameResult {
            game_type,
            score,
            time_in_seconds,
            played_at,
        })
    }
}

/// A registered user's best result per game type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersonalBests {
    records: BTreeMap<GameType, GameResult>,
}

impl PersonalBests {
    pub fn from_records(records: Vec<GameResult>) -> Self {
        let mut bests = PersonalBests::default();
        for record in records {
            // Legacy documents may hold duplicates for a type; the highest one wins.
            bests.merge(record);
        }
        bests
    }

    pub fn get(&self, game_type: GameType) -> Option<&GameResult> {
        self.records.get(&game_type)
    }

    /// Keeps `candidate` when it is the first result for its type or strictly
    /// beats the stored score. Returns whether it was kept.
    pub fn merge(&mut self, candidate: GameResult) -> bool {
        match self.records.get(&candidate.game_type) {
            Some(existing) if candidate.score <= existing.score => false,
            _ => {
                self.records.insert(candidate.game_type, candidate);
                true
            }
        }
    }

    pub fn records(&self, game_type: Option<GameType>) -> Vec<GameResult> {
        self.records
            .values()
            .filter(|record| game_type.map_or(true, |wanted| record.game_type == wanted))
            .cloned()
            .collect()
    }

    pub fn into_records(self) -> Vec<GameResult> {
        self.records.into_values().collect()
    }
}
