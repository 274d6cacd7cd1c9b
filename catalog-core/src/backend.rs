//! Storage backend abstraction for record collections.
//!
//! The [`RecordBackend`] trait is the seam between validated collections and
//! whatever actually holds the records. Implementations must be thread-safe:
//! many requests call into the same backend concurrently, and every operation
//! on a single record must appear atomic to other callers.
//!
//! # Traits
//!
//! - [`RecordBackend`]: The async interface every store implements
//! - [`RecordBackendBuilder`]: Factory trait for creating backend instances
//!
//! A backend shared across a whole server is usually held as a
//! [`SharedBackend`], an `Arc<dyn RecordBackend>`.
//!
//! # Examples
//!
//! ```ignore
//! use catalog_core::backend::RecordBackend;
//! use catalog_core::filter::Filter;
//! use bson::doc;
//!
//! let backend = MyBackendImpl::new();
//! backend.insert_records(vec![doc! { "id": "a1", "name": "Alice" }], "users").await?;
//! let alices = backend.find_records(&Filter::eq("name", "Alice"), "users").await?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

use crate::{error::CollectionResult, filter::Filter, record::Record};

/// Abstract interface for record storage backends.
///
/// Records handed to a backend always carry a string `id` field. Backends do
/// not validate records; that happens in [`Collection`](crate::collection::Collection)
/// before any write reaches the backend.
#[async_trait]
pub trait RecordBackend: Send + Sync + Debug {
    /// Appends records to a collection, creating the collection if needed.
    ///
    /// Either every record is stored or none is.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::DuplicateId`](crate::error::CollectionError::DuplicateId)
    /// if any record's identifier is already present in the collection.
    async fn insert_records(&self, records: Vec<Record>, collection: &str) -> CollectionResult<()>;

    /// Replaces the record with identifier `id` wholesale, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`](crate::error::CollectionError::NotFound)
    /// if no record has that identifier.
    async fn replace_record(&self, id: &str, record: Record, collection: &str) -> CollectionResult<()>;

    /// Removes the record with identifier `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`](crate::error::CollectionError::NotFound)
    /// if no record has that identifier.
    async fn remove_record(&self, id: &str, collection: &str) -> CollectionResult<Record>;

    /// Returns every record matching `filter`, in store order.
    ///
    /// A collection that was never written to yields an empty result.
    async fn find_records(&self, filter: &Filter, collection: &str) -> CollectionResult<Vec<Record>>;

    /// Removes every record in a collection.
    async fn clear_records(&self, collection: &str) -> CollectionResult<()>;

    /// Lists the names of all collections holding records.
    async fn list_collections(&self) -> CollectionResult<Vec<String>>;

    /// Releases connections and other resources held by the backend.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(&self) -> CollectionResult<()> {
        Ok(())
    }
}

#[async_trait]
impl<B> RecordBackend for Arc<B>
where
    B: RecordBackend + ?Sized,
{
    async fn insert_records(&self, records: Vec<Record>, collection: &str) -> CollectionResult<()> {
        (**self).insert_records(records, collection).await
    }

    async fn replace_record(&self, id: &str, record: Record, collection: &str) -> CollectionResult<()> {
        (**self).replace_record(id, record, collection).await
    }

    async fn remove_record(&self, id: &str, collection: &str) -> CollectionResult<Record> {
        (**self).remove_record(id, collection).await
    }

    async fn find_records(&self, filter: &Filter, collection: &str) -> CollectionResult<Vec<Record>> {
        (**self).find_records(filter, collection).await
    }

    async fn clear_records(&self, collection: &str) -> CollectionResult<()> {
        (**self).clear_records(collection).await
    }

    async fn list_collections(&self) -> CollectionResult<Vec<String>> {
        (**self).list_collections().await
    }

    async fn shutdown(&self) -> CollectionResult<()> {
        (**self).shutdown().await
    }
}

/// A type-erased backend shared between collections.
pub type SharedBackend = Arc<dyn RecordBackend>;

#[async_trait]
pub trait RecordBackendBuilder: Send + Sized {
    type Backend: RecordBackend;

    async fn build(self) -> CollectionResult<Self::Backend>;
}
