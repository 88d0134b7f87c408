use crate::constants::LEADERBOARD_COLL_NAME;
use crate::models::game::{GameResult, GameType};
use crate::models::leaderboard::LeaderboardEntry;
use crate::repositories::store::{DocumentStore, FindSpec, StoreResult};
use chrono::{DateTime, Utc};
use mongodb::bson::{doc, from_document, to_document, Bson, Document};

fn decode_entries(documents: Vec<Document>) -> StoreResult<Vec<LeaderboardEntry>> {
    documents
        .into_iter()
        .map(|doc| from_document(doc).map_err(Into::into))
        .collect()
}

pub async fn fetch_entry(
    store: &dyn DocumentStore,
    key: Document,
) -> StoreResult<Option<LeaderboardEntry>> {
    match store.find_one(LEADERBOARD_COLL_NAME, key).await? {
        Some(doc) => Ok(Some(from_document(doc)?)),
        None => Ok(None),
    }
}

pub async fn insert_entry(store: &dyn DocumentStore, entry: &LeaderboardEntry) -> StoreResult<Bson> {
    store
        .insert_one(LEADERBOARD_COLL_NAME, to_document(entry)?)
        .await
}

/// Overwrites score, time and played_at on the keyed entry, but only while the
/// stored score is lower than the new one. Returns whether a write happened.
pub async fn raise_entry_score(
    store: &dyn DocumentStore,
    mut key: Document,
    result: &GameResult,
) -> StoreResult<bool> {
    key.insert("score", doc! { "$lt": result.score });

    let fields = doc! {
        "score": result.score,
        "time_in_seconds": result.time_in_seconds,
        "played_at": bson::DateTime::from_chrono(result.played_at),
    };

    let matched = store.update_one(LEADERBOARD_COLL_NAME, key, fields).await?;
    Ok(matched > 0)
}

pub async fn fetch_top_entries(
    store: &dyn DocumentStore,
    game_type: GameType,
    limit: i64,
    skip: u64,
) -> StoreResult<Vec<LeaderboardEntry>> {
    let documents = store
        .find(
            LEADERBOARD_COLL_NAME,
            doc! { "game_type": game_type.as_str() },
            FindSpec::sorted(doc! { "score": -1 }).page(limit, skip),
        )
        .await?;

    decode_entries(documents)
}

pub async fn count_entries(store: &dyn DocumentStore, game_type: GameType) -> StoreResult<u64> {
    store
        .count_documents(LEADERBOARD_COLL_NAME, doc! { "game_type": game_type.as_str() })
        .await
}

pub async fn fetch_guest_entries(
    store: &dyn DocumentStore,
    guest_id: &str,
    game_type: Option<GameType>,
) -> StoreResult<Vec<LeaderboardEntry>> {
    let mut filter = doc! { "guest_id": guest_id, "is_guest": true };
    if let Some(game_type) = game_type {
        filter.insert("game_type", game_type.as_str());
    }

    let documents = store
        .find(LEADERBOARD_COLL_NAME, filter, FindSpec::default())
        .await?;

    decode_entries(documents)
}

pub async fn delete_guest_entries_before(
    store: &dyn DocumentStore,
    cutoff: DateTime<Utc>,
) -> StoreResult<u64> {
    store
        .delete_many(
            LEADERBOARD_COLL_NAME,
            doc! {
                "is_guest": true,
                "played_at": { "$lt": bson::DateTime::from_chrono(cutoff) },
            },
        )
        .await
}
