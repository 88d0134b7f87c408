use crate::errors::{AppError, StoreContext};
use crate::models::game::GameResult;
use crate::models::identity::Identity;
use crate::models::leaderboard::{entry_key, LeaderboardEntry};
use crate::repositories::leaderboard_repository::{fetch_entry, insert_entry, raise_entry_score};
use crate::repositories::store::{DocumentStore, StoreError};
use crate::repositories::user_repository::{fetch_user_by_id, save_personal_bests};
use crate::utils::keyed_lock::KeyedLocks;
use mongodb::bson::oid::ObjectId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub leaderboard_updated: bool,
}

/// Merges `result` into the caller's personal bests (registered users only)
/// and into the leaderboard.
///
/// Work for one identity and game type is serialized through `locks`; the
/// leaderboard write itself only lands while the stored score is lower, so a
/// second process racing on the same store cannot lower a best score either.
pub async fn submit_record(
    store: &dyn DocumentStore,
    locks: &KeyedLocks,
    identity: &Identity,
    result: GameResult,
) -> Result<SubmitOutcome, AppError> {
    let game_type = result.game_type;
    let _guard = locks.lock(format!("{}:{}", identity, game_type)).await;

    let leaderboard_updated = match identity {
        Identity::Guest { .. } => upsert_leaderboard_entry(store, identity, "", &result).await?,
        Identity::Registered { id } => submit_registered(store, identity, id, result).await?,
    };

    log::info!(
        "Recorded {} game for {} (leaderboard updated: {})",
        game_type,
        identity,
        leaderboard_updated
    );

    Ok(SubmitOutcome {
        leaderboard_updated,
    })
}

async fn submit_registered(
    store: &dyn DocumentStore,
    identity: &Identity,
    id: &ObjectId,
    result: GameResult,
) -> Result<bool, AppError> {
    let user = fetch_user_by_id(store, id)
        .await
        .context("Failed to retrieve user")?
        .ok_or_else(AppError::user_not_found)?;

    let mut bests = user.personal_bests();
    let improved = bests.merge(result.clone());

    log::debug!(
        "Personal best for {} on {}: {}",
        user.username,
        result.game_type,
        if improved { "replaced" } else { "kept" }
    );

    let matched = save_personal_bests(store, id, bests)
        .await
        .context("Failed to update user's game records")?;
    if matched == 0 {
        return Err(AppError::user_not_found());
    }

    if !improved {
        return Ok(false);
    }

    upsert_leaderboard_entry(store, identity, &user.username, &result).await
}

/// Creates the identity's entry for this game type or raises its score.
/// Equal or lower scores leave the entry untouched.
async fn upsert_leaderboard_entry(
    store: &dyn DocumentStore,
    identity: &Identity,
    owner: &str,
    result: &GameResult,
) -> Result<bool, AppError> {
    let key = entry_key(identity, result.game_type);

    let existing = fetch_entry(store, key.clone())
        .await
        .context("Failed to retrieve leaderboard entry")?;

    match existing {
        None => {
            let entry = LeaderboardEntry::new(identity, owner, result);
            match insert_entry(store, &entry).await {
                Ok(_) => Ok(true),
                // Another process created the entry first; compete on score instead.
                Err(StoreError::DuplicateKey(_)) => raise_entry_score(store, key, result)
                    .await
                    .context("Failed to update leaderboard entry"),
                Err(err) => Err(err).context("Failed to save game record to leaderboard"),
            }
        }
        Some(existing) if result.score > existing.score => raise_entry_score(store, key, result)
            .await
            .context("Failed to update leaderboard entry"),
        Some(_) => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::LEADERBOARD_COLL_NAME;
    use crate::models::game::GameType;
    use crate::models::user::User;
    use crate::repositories::leaderboard_repository::count_entries;
    use crate::repositories::memory_store::MemoryStore;
    use crate::repositories::store::{FindSpec, StoreResult};
    use crate::repositories::user_repository::insert_user;
    use mongodb::bson::{Bson, Document};

    async fn registered(store: &MemoryStore, username: &str) -> Identity {
        let user = User::new(username.to_string(), "hash".to_string());
        let id = user.id.unwrap();
        insert_user(store, &user).await.unwrap();
        Identity::Registered { id }
    }

    fn result(game_type: &str, score: i64) -> GameResult {
        GameResult::new(game_type, score, 60).unwrap()
    }

    async fn leaderboard_score(store: &MemoryStore, identity: &Identity, game_type: GameType) -> i64 {
        fetch_entry(store, entry_key(identity, game_type))
            .await
            .unwrap()
            .unwrap()
            .score
    }

    #[actix_rt::test]
    async fn lower_score_keeps_personal_best_and_leaderboard() {
        let store = MemoryStore::new();
        let locks = KeyedLocks::new();
        let alice = registered(&store, "alice").await;

        let first = submit_record(&store, &locks, &alice, result("normal", 50)).await.unwrap();
        let second = submit_record(&store, &locks, &alice, result("normal", 30)).await.unwrap();

        assert!(first.leaderboard_updated);
        assert!(!second.leaderboard_updated);

        let Identity::Registered { id } = &alice else { unreachable!() };
        let user = fetch_user_by_id(&store, id).await.unwrap().unwrap();
        assert_eq!(user.personal_bests().get(GameType::Normal).unwrap().score, 50);
        assert_eq!(leaderboard_score(&store, &alice, GameType::Normal).await, 50);
    }

    #[actix_rt::test]
    async fn personal_best_tracks_maximum_across_sequence() {
        let store = MemoryStore::new();
        let locks = KeyedLocks::new();
        let bob = registered(&store, "bob").await;

        for score in [10, 40, 40, 5, 70, 69] {
            submit_record(&store, &locks, &bob, result("infinite", score)).await.unwrap();
        }

        let Identity::Registered { id } = &bob else { unreachable!() };
        let user = fetch_user_by_id(&store, id).await.unwrap().unwrap();
        assert_eq!(user.personal_bests().get(GameType::Infinite).unwrap().score, 70);
        assert_eq!(leaderboard_score(&store, &bob, GameType::Infinite).await, 70);
        assert_eq!(count_entries(&store, GameType::Infinite).await.unwrap(), 1);
    }

    #[actix_rt::test]
    async fn game_types_are_tracked_independently() {
        let store = MemoryStore::new();
        let locks = KeyedLocks::new();
        let carol = registered(&store, "carol").await;

        submit_record(&store, &locks, &carol, result("normal", 20)).await.unwrap();
        let outcome = submit_record(&store, &locks, &carol, result("infinite", 5)).await.unwrap();
        assert!(outcome.leaderboard_updated);

        let Identity::Registered { id } = &carol else { unreachable!() };
        let user = fetch_user_by_id(&store, id).await.unwrap().unwrap();
        assert_eq!(user.game_records.len(), 2);
        assert_eq!(count_entries(&store, GameType::Normal).await.unwrap(), 1);
        assert_eq!(count_entries(&store, GameType::Infinite).await.unwrap(), 1);
    }

    #[actix_rt::test]
    async fn guest_equal_score_does_not_overwrite() {
        let store = MemoryStore::new();
        let locks = KeyedLocks::new();
        let guest = Identity::Guest { id: "65a1f0c2d3e4b5a6f7e8d9c0".into() };

        let first = result("normal", 42);
        assert!(submit_record(&store, &locks, &guest, first.clone()).await.unwrap().leaderboard_updated);

        let mut tie = result("normal", 42);
        tie.time_in_seconds = 1;
        assert!(!submit_record(&store, &locks, &guest, tie).await.unwrap().leaderboard_updated);

        let entry = fetch_entry(&store, entry_key(&guest, GameType::Normal)).await.unwrap().unwrap();
        assert_eq!(entry.time_in_seconds, first.time_in_seconds);
        assert_eq!(entry.username, "Guest_65a1f0");

        assert!(submit_record(&store, &locks, &guest, result("normal", 43)).await.unwrap().leaderboard_updated);
        assert_eq!(leaderboard_score(&store, &guest, GameType::Normal).await, 43);
    }

    #[actix_rt::test]
    async fn guest_lower_score_leaves_entry_untouched() {
        let store = MemoryStore::new();
        let locks = KeyedLocks::new();
        let guest = Identity::Guest { id: "75b2e1d3c4f5a6b7c8d9e0f1".into() };

        let best = result("infinite", 120);
        submit_record(&store, &locks, &guest, best.clone()).await.unwrap();

        let mut worse = result("infinite", 80);
        worse.time_in_seconds = 5;
        let outcome = submit_record(&store, &locks, &guest, worse).await.unwrap();
        assert!(!outcome.leaderboard_updated);

        let entry = fetch_entry(&store, entry_key(&guest, GameType::Infinite)).await.unwrap().unwrap();
        assert_eq!(entry.score, 120);
        assert_eq!(entry.time_in_seconds, best.time_in_seconds);
        assert_eq!(entry.played_at.timestamp_millis(), best.played_at.timestamp_millis());
        assert_eq!(count_entries(&store, GameType::Infinite).await.unwrap(), 1);
    }

    /// Lets another writer create the leaderboard entry between our lookup and
    /// our insert, the way a second server process sharing the database would.
    struct RivalWriterStore {
        inner: MemoryStore,
        rival: std::sync::Mutex<Option<LeaderboardEntry>>,
    }

    impl RivalWriterStore {
        fn new(rival: LeaderboardEntry) -> Self {
            RivalWriterStore {
                inner: MemoryStore::new(),
                rival: std::sync::Mutex::new(Some(rival)),
            }
        }
    }

    #[async_trait::async_trait]
    impl DocumentStore for RivalWriterStore {
        async fn find_one(&self, collection: &str, filter: Document) -> StoreResult<Option<Document>> {
            self.inner.find_one(collection, filter).await
        }

        async fn find(
            &self,
            collection: &str,
            filter: Document,
            options: FindSpec,
        ) -> StoreResult<Vec<Document>> {
            self.inner.find(collection, filter, options).await
        }

        async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<Bson> {
            let rival = self.rival.lock().unwrap().take();
            match rival {
                Some(rival) if collection == LEADERBOARD_COLL_NAME => {
                    insert_entry(&self.inner, &rival).await?;
                    Err(StoreError::DuplicateKey(collection.to_string()))
                }
                _ => self.inner.insert_one(collection, document).await,
            }
        }

        async fn update_one(
            &self,
            collection: &str,
            filter: Document,
            fields: Document,
        ) -> StoreResult<u64> {
            self.inner.update_one(collection, filter, fields).await
        }

        async fn count_documents(&self, collection: &str, filter: Document) -> StoreResult<u64> {
            self.inner.count_documents(collection, filter).await
        }

        async fn delete_many(&self, collection: &str, filter: Document) -> StoreResult<u64> {
            self.inner.delete_many(collection, filter).await
        }
    }

    #[actix_rt::test]
    async fn lost_insert_race_raises_rival_entry_when_higher() {
        let guest = Identity::Guest { id: "85c3f2e4d5a6b7c8d9e0f1a2".into() };
        let store = RivalWriterStore::new(LeaderboardEntry::new(&guest, "", &result("normal", 40)));
        let locks = KeyedLocks::new();

        let outcome = submit_record(&store, &locks, &guest, result("normal", 60)).await.unwrap();
        assert!(outcome.leaderboard_updated);

        let entry = fetch_entry(&store, entry_key(&guest, GameType::Normal)).await.unwrap().unwrap();
        assert_eq!(entry.score, 60);
        assert_eq!(count_entries(&store, GameType::Normal).await.unwrap(), 1);
    }

    #[actix_rt::test]
    async fn lost_insert_race_keeps_rival_entry_when_lower() {
        let guest = Identity::Guest { id: "95d4a3f5e6b7c8d9e0f1a2b3".into() };
        let store = RivalWriterStore::new(LeaderboardEntry::new(&guest, "", &result("normal", 80)));
        let locks = KeyedLocks::new();

        let outcome = submit_record(&store, &locks, &guest, result("normal", 60)).await.unwrap();
        assert!(!outcome.leaderboard_updated);

        let entry = fetch_entry(&store, entry_key(&guest, GameType::Normal)).await.unwrap().unwrap();
        assert_eq!(entry.score, 80);
        assert_eq!(count_entries(&store, GameType::Normal).await.unwrap(), 1);
    }

    #[actix_rt::test]
    async fn unknown_registered_user_is_an_identity_error() {
        let store = MemoryStore::new();
        let locks = KeyedLocks::new();
        let ghost = Identity::Registered { id: ObjectId::new() };

        let err = submit_record(&store, &locks, &ghost, result("normal", 1)).await.unwrap_err();
        assert!(matches!(err, AppError::Identity(_)));
        assert_eq!(count_entries(&store, GameType::Normal).await.unwrap(), 0);
    }

    #[actix_rt::test]
    async fn diverged_leaderboard_copy_is_never_lowered() {
        let store = MemoryStore::new();
        let locks = KeyedLocks::new();
        let dave = registered(&store, "dave").await;

        let stale = LeaderboardEntry::new(&dave, "dave", &result("normal", 500));
        insert_entry(&store, &stale).await.unwrap();

        let outcome = submit_record(&store, &locks, &dave, result("normal", 100)).await.unwrap();
        assert!(!outcome.leaderboard_updated);
        assert_eq!(leaderboard_score(&store, &dave, GameType::Normal).await, 500);
    }

    #[actix_rt::test]
    async fn concurrent_submissions_keep_the_maximum() {
        let store = std::sync::Arc::new(MemoryStore::new());
        let locks = std::sync::Arc::new(KeyedLocks::new());
        let erin = registered(&store, "erin").await;

        let mut tasks = Vec::new();
        for score in [30, 90, 10, 60, 80] {
            let store = store.clone();
            let locks = locks.clone();
            let erin = erin.clone();
            tasks.push(actix_rt::spawn(async move {
                submit_record(store.as_ref(), &locks, &erin, result("normal", score))
                    .await
                    .unwrap()
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(leaderboard_score(&store, &erin, GameType::Normal).await, 90);
        let Identity::Registered { id } = &erin else { unreachable!() };
        let user = fetch_user_by_id(store.as_ref(), id).await.unwrap().unwrap();
        assert_eq!(user.personal_bests().get(GameType::Normal).unwrap().score, 90);
    }
}
