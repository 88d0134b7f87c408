use crate::constants::USERS_COLL_NAME;
use crate::models::game::PersonalBests;
use crate::models::user::User;
use crate::repositories::store::{DocumentStore, StoreResult};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, from_document, to_bson, to_document, Bson};

pub async fn fetch_user_by_id(
    store: &dyn DocumentStore,
    id: &ObjectId,
) -> StoreResult<Option<User>> {
    let user_doc = store.find_one(USERS_COLL_NAME, doc! { "_id": *id }).await?;

    match user_doc {
        Some(doc) => Ok(Some(from_document(doc)?)),
        None => Ok(None),
    }
}

pub async fn fetch_user_by_username(
    store: &dyn DocumentStore,
    username: &str,
) -> StoreResult<Option<User>> {
    let user_doc = store
        .find_one(USERS_COLL_NAME, doc! { "username": username })
        .await?;

    match user_doc {
        Some(doc) => Ok(Some(from_document(doc)?)),
        None => Ok(None),
    }
}

pub async fn insert_user(store: &dyn DocumentStore, user: &User) -> StoreResult<Bson> {
    store.insert_one(USERS_COLL_NAME, to_document(user)?).await
}

/// Replaces the whole embedded `game_records` array in one write.
pub async fn save_personal_bests(
    store: &dyn DocumentStore,
    id: &ObjectId,
    bests: PersonalBests,
) -> StoreResult<u64> {
    let records = to_bson(&bests.into_records())?;
    let now = bson::DateTime::from_chrono(Utc::now());

    store
        .update_one(
            USERS_COLL_NAME,
            doc! { "_id": *id },
            doc! { "game_records": records, "updated_at": now },
        )
        .await
}
