use crate::repositories::store::{DocumentStore, FindSpec, StoreError, StoreResult};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document};
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process document store with Mongo-like filter semantics.
///
/// Supports equality plus `$lt`, `$lte`, `$gt`, `$gte` and `$ne` on top-level
/// fields. Documents keep insertion order, and sorting is stable, so ties
/// come back in storage order.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    unique_fields: HashMap<String, Vec<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Rejects inserts that repeat an existing value of `field` in `collection`.
    pub fn with_unique(mut self, collection: &str, field: &str) -> Self {
        self.unique_fields
            .entry(collection.to_string())
            .or_default()
            .push(field.to_string());
        self
    }

    fn violates_unique(&self, collection: &str, existing: &[Document], document: &Document) -> bool {
        let Some(fields) = self.unique_fields.get(collection) else {
            return false;
        };

        fields.iter().any(|field| match document.get(field) {
            Some(value) => existing
                .iter()
                .any(|other| other.get(field).map_or(false, |v| values_equal(v, value))),
            None => false,
        })
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_one(&self, collection: &str, filter: Document) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(None);
        };

        for document in documents {
            if matches_filter(document, &filter)? {
                return Ok(Some(document.clone()));
            }
        }
        Ok(None)
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        options: FindSpec,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut found = Vec::new();
        for document in documents {
            if matches_filter(document, &filter)? {
                found.push(document.clone());
            }
        }

        if let Some(sort) = &options.sort {
            let keys = sort_keys(sort)?;
            found.sort_by(|a, b| compare_by_keys(a, b, &keys));
        }

        let skip = options.skip.unwrap_or(0) as usize;
        let found = found.into_iter().skip(skip);

        // Mongo semantics: 0 means unbounded, a negative limit is taken as its magnitude.
        Ok(match options.limit {
            Some(limit) if limit != 0 => found.take(limit.unsigned_abs() as usize).collect(),
            _ => found.collect(),
        })
    }

    async fn insert_one(&self, collection: &str, mut document: Document) -> StoreResult<Bson> {
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection.to_string()).or_default();

        if self.violates_unique(collection, documents, &document) {
            return Err(StoreError::DuplicateKey(collection.to_string()));
        }

        if !document.contains_key("_id") {
            document.insert("_id", ObjectId::new());
        }
        let id = document.get("_id").cloned().unwrap_or(Bson::Null);
        documents.push(document);
        Ok(id)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        fields: Document,
    ) -> StoreResult<u64> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };

        for document in documents.iter_mut() {
            if matches_filter(document, &filter)? {
                for (key, value) in fields {
                    document.insert(key, value);
                }
                return Ok(1);
            }
        }
        Ok(0)
    }

    async fn count_documents(&self, collection: &str, filter: Document) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        let Some(documents) = collections.get(collection) else {
            return Ok(0);
        };

        let mut count = 0;
        for document in documents {
            if matches_filter(document, &filter)? {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn delete_many(&self, collection: &str, filter: Document) -> StoreResult<u64> {
        let mut collections = self.collections.write().await;
        let Some(documents) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let mut kept = Vec::with_capacity(documents.len());
        let mut deleted = 0;
        for document in documents.drain(..) {
            if matches_filter(&document, &filter)? {
                deleted += 1;
            } else {
                kept.push(document);
            }
        }
        *documents = kept;
        Ok(deleted)
    }
}

fn matches_filter(document: &Document, filter: &Document) -> StoreResult<bool> {
    for (field, condition) in filter {
        let value = document.get(field);

        let matched = match condition {
            Bson::Document(operators) if is_operator_document(operators) => {
                matches_operators(value, operators)?
            }
            expected => value.map_or(false, |v| values_equal(v, expected)),
        };

        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn is_operator_document(document: &Document) -> bool {
    !document.is_empty() && document.keys().all(|key| key.starts_with('$'))
}

fn matches_operators(value: Option<&Bson>, operators: &Document) -> StoreResult<bool> {
    for (operator, operand) in operators {
        let matched = match operator.as_str() {
            "$ne" => value.map_or(true, |v| !values_equal(v, operand)),
            "$lt" => ordering(value, operand) == Some(Ordering::Less),
            "$lte" => matches!(
                ordering(value, operand),
                Some(Ordering::Less | Ordering::Equal)
            ),
            "$gt" => ordering(value, operand) == Some(Ordering::Greater),
            "$gte" => matches!(
                ordering(value, operand),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            other => return Err(StoreError::UnsupportedFilter(other.to_string())),
        };

        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn ordering(value: Option<&Bson>, operand: &Bson) -> Option<Ordering> {
    value.and_then(|v| compare_values(v, operand))
}

fn values_equal(a: &Bson, b: &Bson) -> bool {
    compare_values(a, b).map_or(a == b, |ord| ord == Ordering::Equal)
}

fn compare_values(a: &Bson, b: &Bson) -> Option<Ordering> {
    match (a, b) {
        (Bson::String(a), Bson::String(b)) => Some(a.cmp(b)),
        (Bson::Boolean(a), Bson::Boolean(b)) => Some(a.cmp(b)),
        (Bson::DateTime(a), Bson::DateTime(b)) => {
            Some(a.timestamp_millis().cmp(&b.timestamp_millis()))
        }
        (Bson::ObjectId(a), Bson::ObjectId(b)) => Some(a.bytes().cmp(&b.bytes())),
        _ => match (as_integer(a), as_integer(b)) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => as_float(a)?.partial_cmp(&as_float(b)?),
        },
    }
}

fn as_integer(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(n) => Some(i64::from(*n)),
        Bson::Int64(n) => Some(*n),
        _ => None,
    }
}

fn as_float(value: &Bson) -> Option<f64> {
    match value {
        Bson::Double(n) => Some(*n),
        other => as_integer(other).map(|n| n as f64),
    }
}

fn sort_keys(sort: &Document) -> StoreResult<Vec<(String, bool)>> {
    sort.iter()
        .map(|(field, direction)| match as_integer(direction) {
            Some(1) => Ok((field.clone(), true)),
            Some(-1) => Ok((field.clone(), false)),
            _ => Err(StoreError::UnsupportedFilter(format!(
                "sort direction for '{}'",
                field
            ))),
        })
        .collect()
}

fn compare_by_keys(a: &Document, b: &Document, keys: &[(String, bool)]) -> Ordering {
    for (field, ascending) in keys {
        let ord = match (a.get(field), b.get(field)) {
            (Some(x), Some(y)) => compare_values(x, y).unwrap_or(Ordering::Equal),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        let ord = if *ascending { ord } else { ord.reverse() };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
