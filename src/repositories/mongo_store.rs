use crate::repositories::store::{DocumentStore, FindSpec, StoreError, StoreResult};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::{Collection, Database};

const DUPLICATE_KEY_CODE: i32 = 11000;

pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    pub fn new(database: Database) -> Self {
        MongoStore { database }
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find_one(&self, collection: &str, filter: Document) -> StoreResult<Option<Document>> {
        Ok(self.collection(collection).find_one(filter).await?)
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        options: FindSpec,
    ) -> StoreResult<Vec<Document>> {
        let coll = self.collection(collection);
        let mut find = coll.find(filter);
        if let Some(sort) = options.sort {
            find = find.sort(sort);
        }
        if let Some(limit) = options.limit {
            find = find.limit(limit);
        }
        if let Some(skip) = options.skip {
            find = find.skip(skip);
        }

        let mut cursor = find.await?;
        let mut documents = Vec::new();

        while let Some(document) = cursor.try_next().await? {
            documents.push(document);
        }

        Ok(documents)
    }

    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<Bson> {
        match self.collection(collection).insert_one(document).await {
            Ok(result) => Ok(result.inserted_id),
            Err(err) if is_duplicate_key(&err) => {
                Err(StoreError::DuplicateKey(collection.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        fields: Document,
    ) -> StoreResult<u64> {
        let update = doc! { "$set": fields };
        let result = self.collection(collection).update_one(filter, update).await?;
        Ok(result.matched_count)
    }

    async fn count_documents(&self, collection: &str, filter: Document) -> StoreResult<u64> {
        Ok(self.collection(collection).count_documents(filter).await?)
    }

    async fn delete_many(&self, collection: &str, filter: Document) -> StoreResult<u64> {
        let result = self.collection(collection).delete_many(filter).await?;
        Ok(result.deleted_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::Client;

    async fn unreachable_store() -> MongoStore {
        let client = Client::with_uri_str("mongodb://127.0.0.1:1/?serverSelectionTimeoutMS=200")
            .await
            .unwrap();
        MongoStore::new(client.database("minesweeper_test"))
    }

    #[actix_rt::test]
    async fn sorted_page_query_surfaces_driver_errors() {
        let store = unreachable_store().await;
        let err = store
            .find(
                "leaderboard",
                doc! { "game_type": "normal" },
                FindSpec::sorted(doc! { "score": -1 }).page(10, 0),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }

    #[actix_rt::test]
    async fn failed_insert_is_not_a_duplicate_key() {
        let store = unreachable_store().await;
        let err = store
            .insert_one("users", doc! { "username": "alice" })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
