use crate::models::game::{GameResult, PersonalBests};
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub username: String,
    pub password: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub game_records: Vec<GameResult>,
}

impl User {
    pub fn new(username: String, password_hash: String) -> Self {
        let now = Utc::now();
        User {
            id: Some(ObjectId::new()),
            username,
            password: password_hash,
            created_at: now,
            updated_at: now,
            game_records: Vec::new(),
        }
    }

    pub fn personal_bests(&self) -> PersonalBests {
        PersonalBests::from_records(self.game_records.clone())
    }
}
