//! MongoDB storage backend.
//!
//! Each catalog collection maps to a MongoDB collection of the same
//! (escaped) name in the configured database.

use async_trait::async_trait;
use bson::{Document, doc};
use futures::TryStreamExt;
use mongodb::{Client, Collection as MongoCollection, options::ClientOptions};

use catalog_core::{
    backend::{RecordBackend, RecordBackendBuilder},
    error::{CollectionError, CollectionResult},
    filter::Filter,
    record::{Record, RecordExt},
};

use crate::{
    escape::KeyEscaper,
    filter::{MONGO_ID_FIELD, MongoFilterTranslator},
};

fn backend_error(err: mongodb::error::Error) -> CollectionError {
    CollectionError::Backend(err.to_string())
}

/// MongoDB-backed record store.
///
/// Records are written with `_id` set to their string `id`, so identifier
/// lookups use the primary key index. Results come back in natural order,
/// which for a collection without deletes is insertion order.
#[derive(Debug, Clone)]
pub struct MongoDbStore {
    client: Client,
    database: String,
}

impl MongoDbStore {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoDbStoreBuilder {
        MongoDbStoreBuilder::new(dsn, database)
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(&KeyEscaper::escape_key(collection_name))
    }

    fn prepare_record(&self, record: &Record) -> CollectionResult<Document> {
        let id = record
            .record_id()
            .ok_or_else(|| CollectionError::Backend("record has no string id".into()))?;

        let mut prepared = doc! { MONGO_ID_FIELD: id };
        prepared.extend(KeyEscaper::escape_record(record));

        Ok(prepared)
    }

    fn restore_record(&self, mut document: Document) -> Record {
        document.remove(MONGO_ID_FIELD);
        KeyEscaper::unescape_record(&document)
    }
}

#[async_trait]
impl RecordBackend for MongoDbStore {
    async fn insert_records(&self, records: Vec<Record>, collection: &str) -> CollectionResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let prepared = records
            .iter()
            .map(|record| self.prepare_record(record))
            .collect::<CollectionResult<Vec<_>>>()?;

        let mut ids = Vec::with_capacity(prepared.len());
        for document in &prepared {
            let id = document.get_str(MONGO_ID_FIELD).unwrap_or_default().to_string();
            if ids.contains(&id) {
                return Err(CollectionError::DuplicateId(id, collection.to_string()));
            }
            ids.push(id);
        }

        // Reject the batch up front; an ordered insert_many would otherwise
        // keep the records before the first duplicate.
        let existing = self
            .get_collection(collection)
            .find_one(doc! { MONGO_ID_FIELD: { "$in": ids.clone() } })
            .await
            .map_err(backend_error)?;

        if let Some(existing) = existing {
            let id = existing.get_str(MONGO_ID_FIELD).unwrap_or_default().to_string();
            return Err(CollectionError::DuplicateId(id, collection.to_string()));
        }

        self.get_collection(collection)
            .insert_many(prepared)
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn replace_record(&self, id: &str, record: Record, collection: &str) -> CollectionResult<()> {
        let result = self
            .get_collection(collection)
            .replace_one(doc! { MONGO_ID_FIELD: id }, self.prepare_record(&record)?)
            .await
            .map_err(backend_error)?;

        if result.matched_count == 0 {
            return Err(CollectionError::NotFound(id.to_string(), collection.to_string()));
        }

        Ok(())
    }

    async fn remove_record(&self, id: &str, collection: &str) -> CollectionResult<Record> {
        self.get_collection(collection)
            .find_one_and_delete(doc! { MONGO_ID_FIELD: id })
            .await
            .map_err(backend_error)?
            .map(|document| self.restore_record(document))
            .ok_or_else(|| CollectionError::NotFound(id.to_string(), collection.to_string()))
    }

    async fn find_records(&self, filter: &Filter, collection: &str) -> CollectionResult<Vec<Record>> {
        Ok(self
            .get_collection(collection)
            .find(MongoFilterTranslator::translate(filter))
            .await
            .map_err(backend_error)?
            .try_collect::<Vec<Document>>()
            .await
            .map_err(backend_error)?
            .into_iter()
            .map(|document| self.restore_record(document))
            .collect())
    }

    async fn clear_records(&self, collection: &str) -> CollectionResult<()> {
        self.get_collection(collection)
            .delete_many(doc! {})
            .await
            .map_err(backend_error)?;

        Ok(())
    }

    async fn list_collections(&self) -> CollectionResult<Vec<String>> {
        let mut names = self
            .client
            .database(&self.database)
            .list_collection_names()
            .await
            .map_err(backend_error)?
            .iter()
            .map(|name| KeyEscaper::unescape_key(name))
            .collect::<Vec<_>>();
        names.sort();

        Ok(names)
    }

    async fn shutdown(&self) -> CollectionResult<()> {
        tracing::debug!(database = %self.database, "shutting down mongodb client");
        self.client.clone().shutdown().immediate(true).await;

        Ok(())
    }
}

pub struct MongoDbStoreBuilder {
    dsn: String,
    database: String,
}

impl MongoDbStoreBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
        }
    }
}

#[async_trait]
impl RecordBackendBuilder for MongoDbStoreBuilder {
    type Backend = MongoDbStore;

    async fn build(self) -> CollectionResult<Self::Backend> {
        let options = ClientOptions::parse(&self.dsn)
            .await
            .map_err(|e| CollectionError::Initialization(e.to_string()))?;
        let client = Client::with_options(options)
            .map_err(|e| CollectionError::Initialization(e.to_string()))?;

        tracing::debug!(database = %self.database, "connected mongodb client");

        Ok(MongoDbStore::new(client, self.database))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::Bson;

    #[tokio::test]
    async fn test_builder_rejects_malformed_dsn() {
        let err = MongoDbStore::builder("not a uri", "catalog").build().await.unwrap_err();
        assert!(matches!(err, CollectionError::Initialization(_)));
    }

    #[tokio::test]
    async fn test_records_round_trip_through_storage_shape() {
        let store = MongoDbStore::builder("mongodb://localhost:27017", "catalog")
            .build()
            .await
            .unwrap();
        let record = doc! { "id": "abc", "price.usd": 10, "tags": ["x"] };

        let prepared = store.prepare_record(&record).unwrap();
        assert_eq!(prepared.get(MONGO_ID_FIELD), Some(&Bson::String("abc".into())));
        assert!(prepared.contains_key("price%2Eusd"));

        assert_eq!(store.restore_record(prepared), record);
        assert!(store.prepare_record(&doc! { "name": "no id" }).is_err());
    }

    #[tokio::test]
    async fn test_payload_primary_key_field_cannot_replace_id() {
        let store = MongoDbStore::builder("mongodb://localhost:27017", "catalog")
            .build()
            .await
            .unwrap();
        let record = doc! { "id": "minted-uuid", "_id": "chosen-by-client", "name": "x" };

        let prepared = store.prepare_record(&record).unwrap();
        assert_eq!(prepared.get_str(MONGO_ID_FIELD).unwrap(), "minted-uuid");
        assert_eq!(prepared.get_str("%5Fid").unwrap(), "chosen-by-client");

        assert_eq!(store.restore_record(prepared), record);
    }
}
