use crate::models::game::{GameResult, GameType};
use crate::models::identity::{guest_display_name, Identity};
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Document};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct LeaderboardEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub game_type: GameType,
    pub score: i64,
    pub time_in_seconds: i64,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub played_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_id: Option<String>,
    pub is_guest: bool,
}

impl LeaderboardEntry {
    /// Builds a fresh entry for `identity`; `owner` is the registered
    /// username and is ignored for guests.
    pub fn new(identity: &Identity, owner: &str, result: &GameResult) -> Self {
        let (user_id, guest_id, username) = match identity {
            Identity::Registered { id } => (Some(id.to_hex()), None, owner.to_string()),
            Identity::Guest { id } => (None, Some(id.clone()), guest_display_name(id)),
        };

        LeaderboardEntry {
            id: Some(ObjectId::new()),
            game_type: result.game_type,
            score: result.score,
            time_in_seconds: result.time_in_seconds,
            played_at: result.played_at,
            user_id,
            username,
            guest_id,
            is_guest: identity.is_guest(),
        }
    }

    pub fn to_result(&self) -> GameResult {
        GameResult {
            game_type: self.game_type,
            score: self.score,
            time_in_seconds: self.time_in_seconds,
            played_at: self.played_at,
        }
    }
}

/// Filter selecting the single entry owned by `identity` for `game_type`.
pub fn entry_key(identity: &Identity, game_type: GameType) -> Document {
    match identity {
        Identity::Registered { id } => doc! {
            "user_id": id.to_hex(),
            "game_type": game_type.as_str(),
            "is_guest": false,
        },
        Identity::Guest { id } => doc! {
            "guest_id": id,
            "game_type": game_type.as_str(),
            "is_guest": true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guest_entry_carries_derived_name() {
        let guest = Identity::Guest { id: "65a1f0c2d3e4b5a6f7e8d9c0".into() };
        let result = GameResult::new("infinite", 12, 30).unwrap();
        let entry = LeaderboardEntry::new(&guest, "ignored", &result);

        assert_eq!(entry.username, "Guest_65a1f0");
        assert!(entry.is_guest);
        assert!(entry.user_id.is_none());
        assert_eq!(entry.to_result(), result);
    }

    #[test]
    fn keys_separate_identity_classes() {
        let id = ObjectId::new();
        let key = entry_key(&Identity::Registered { id }, GameType::Normal);
        assert_eq!(key.get_str("user_id").unwrap(), id.to_hex());
        assert!(!key.get_bool("is_guest").unwrap());

        let key = entry_key(&Identity::Guest { id: "g1".into() }, GameType::Infinite);
        assert_eq!(key.get_str("guest_id").unwrap(), "g1");
        assert_eq!(key.get_str("game_type").unwrap(), "infinite");
        assert!(key.get_bool("is_guest").unwrap());
    }
}
