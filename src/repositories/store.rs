use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),

    #[error("failed to decode document: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("duplicate key in collection '{0}'")]
    DuplicateKey(String),

    #[error("unsupported filter: {0}")]
    UnsupportedFilter(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Sort/paging options for [`DocumentStore::find`].
#[derive(Clone, Debug, Default)]
pub struct FindSpec {
    pub sort: Option<Document>,
    pub limit: Option<i64>,
    pub skip: Option<u64>,
}

impl FindSpec {
    pub fn sorted(sort: Document) -> Self {
        FindSpec {
            sort: Some(sort),
            ..FindSpec::default()
        }
    }

    pub fn page(mut self, limit: i64, skip: u64) -> Self {
        self.limit = Some(limit);
        self.skip = Some(skip);
        self
    }
}

/// Filter-based document access. Implementations guarantee nothing beyond a
/// single call; callers own any read-modify-write consistency.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(&self, collection: &str, filter: Document) -> StoreResult<Option<Document>>;

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        options: FindSpec,
    ) -> StoreResult<Vec<Document>>;

    async fn insert_one(&self, collection: &str, document: Document) -> StoreResult<Bson>;

    /// Applies `fields` as a `$set` to the first match; returns the matched count.
    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        fields: Document,
    ) -> StoreResult<u64>;

    async fn count_documents(&self, collection: &str, filter: Document) -> StoreResult<u64>;

    async fn delete_many(&self, collection: &str, filter: Document) -> StoreResult<u64>;
}
