//! In-memory storage implementation for record collections.
//!
//! Records are kept per collection in insertion order behind a single
//! async-aware read-write lock. Writers hold the lock across the whole
//! read-modify-write, so concurrent updates to the same collection are
//! serialized and none is lost.

use async_trait::async_trait;
use bson::Document;
use mea::rwlock::RwLock;
use std::{collections::HashMap, sync::Arc};

use catalog_core::{
    backend::{RecordBackend, RecordBackendBuilder},
    error::{CollectionError, CollectionResult},
    filter::Filter,
    record::{Record, RecordExt},
};

use crate::evaluator::RecordEvaluator;

type StoreMap = HashMap<String, Vec<Document>>;

/// Thread-safe in-memory record storage backend.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped internal state, so
/// clones share the same records. Lookups scan the collection; there are no
/// indexes.
///
/// # Example
///
/// ```ignore
/// use catalog_memory::InMemoryStore;
/// use catalog::backend::RecordBackend;
/// use catalog::filter::Filter;
/// use bson::doc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     store.insert_records(vec![doc! { "id": "a1", "name": "Alice" }], "users").await?;
///
///     let found = store.find_records(&Filter::eq("id", "a1"), "users").await?;
///     assert_eq!(found.len(), 1);
///
///     Ok(())
/// }
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    /// collection name -> records in insertion order
    store: Arc<RwLock<StoreMap>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory record store.
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(StoreMap::new())),
        }
    }

    /// Creates a builder for constructing an `InMemoryStore`.
    pub fn builder() -> InMemoryStoreBuilder {
        InMemoryStoreBuilder::default()
    }
}

fn position_of(records: &[Document], id: &str) -> Option<usize> {
    records.iter().position(|record| record.record_id() == Some(id))
}

fn not_found(id: &str, collection: &str) -> CollectionError {
    CollectionError::NotFound(id.to_string(), collection.to_string())
}

#[async_trait]
impl RecordBackend for InMemoryStore {
    async fn insert_records(&self, records: Vec<Record>, collection: &str) -> CollectionResult<()> {
        let mut store = self.store.write().await;
        let existing = store.get(collection).map(Vec::as_slice).unwrap_or_default();

        // Check the whole batch first so a duplicate leaves the collection untouched.
        let mut seen = Vec::with_capacity(records.len());
        for record in &records {
            let id = record
                .record_id()
                .ok_or_else(|| CollectionError::Backend("record has no string id".into()))?;

            if seen.contains(&id) || position_of(existing, id).is_some() {
                return Err(CollectionError::DuplicateId(id.to_string(), collection.to_string()));
            }
            seen.push(id);
        }

        store
            .entry(collection.to_string())
            .or_default()
            .extend(records);

        Ok(())
    }

    async fn replace_record(&self, id: &str, record: Record, collection: &str) -> CollectionResult<()> {
        let mut store = self.store.write().await;
        let records = store
            .get_mut(collection)
            .ok_or_else(|| not_found(id, collection))?;

        let index = position_of(records, id).ok_or_else(|| not_found(id, collection))?;
        records[index] = record;

        Ok(())
    }

    async fn remove_record(&self, id: &str, collection: &str) -> CollectionResult<Record> {
        let mut store = self.store.write().await;
        let records = store
            .get_mut(collection)
            .ok_or_else(|| not_found(id, collection))?;

        let index = position_of(records, id).ok_or_else(|| not_found(id, collection))?;

        Ok(records.remove(index))
    }

    async fn find_records(&self, filter: &Filter, collection: &str) -> CollectionResult<Vec<Record>> {
        let store = self.store.read().await;

        Ok(match store.get(collection) {
            Some(records) => RecordEvaluator::filter_records(records, filter),
            None => Vec::new(),
        })
    }

    async fn clear_records(&self, collection: &str) -> CollectionResult<()> {
        if let Some(records) = self.store.write().await.get_mut(collection) {
            records.clear();
        }

        Ok(())
    }

    async fn list_collections(&self) -> CollectionResult<Vec<String>> {
        let mut names = self
            .store
            .read()
            .await
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        names.sort();

        Ok(names)
    }
}

/// Builder for constructing [`InMemoryStore`] instances.
///
/// # Example
///
/// ```ignore
/// use catalog_memory::InMemoryStore;
/// use catalog::backend::RecordBackendBuilder;
///
/// let store = InMemoryStore::builder().build().await?;
/// ```
#[derive(Default)]
pub struct InMemoryStoreBuilder;

#[async_trait]
impl RecordBackendBuilder for InMemoryStoreBuilder {
    type Backend = InMemoryStore;

    async fn build(self) -> CollectionResult<Self::Backend> {
        Ok(InMemoryStore::new())
    }
}
