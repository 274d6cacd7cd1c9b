//! Validation-gated access to a named collection of records.
//!
//! A [`Collection`] binds a name and a [`RuleSet`] to a storage backend. Every
//! write is checked against the rule set before it reaches the backend, so a
//! record that fails validation is never stored, partially or otherwise.
//!
//! - [`Collection`] - Collection over a concrete backend type
//! - [`DynCollection`] - Collection over a shared, type-erased backend
//!
//! # Example
//!
//! ```ignore
//! use catalog_core::{collection::Collection, record::RecordExt};
//! use bson::doc;
//!
//! let products = Collection::new("products", rules, backend);
//! let created = products.create(doc! { "name": "mjolnir", "price": 10 }).await?;
//! let id = created.record_id().unwrap();
//!
//! products.update(id, doc! { "name": "mjolnir", "price": 12 }).await?;
//! let removed = products.delete(id).await?;
//! ```

use crate::{
    backend::{RecordBackend, SharedBackend},
    error::{CollectionError, CollectionResult},
    filter::Filter,
    record::{ID_FIELD, Record, RecordExt, mint_id},
    rules::RuleSet,
    validate::check,
};

/// A named collection of records validated against a rule set.
///
/// # Type Parameters
///
/// * `B` - The storage backend type
#[derive(Debug, Clone)]
pub struct Collection<B: RecordBackend> {
    name: String,
    rules: RuleSet,
    backend: B,
}

/// A collection over a shared, type-erased backend.
pub type DynCollection = Collection<SharedBackend>;

impl<B: RecordBackend> Collection<B> {
    pub fn new(name: impl Into<String>, rules: RuleSet, backend: B) -> Self {
        Self {
            name: name.into(),
            rules,
            backend,
        }
    }

    /// Returns the name of this collection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rule set every stored record satisfies.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns every record when `id` is `None`, otherwise the records whose
    /// identifier equals `id` (zero or one).
    ///
    /// An unknown identifier is not an error here; it yields an empty result.
    pub async fn get(&self, id: Option<&str>) -> CollectionResult<Vec<Record>> {
        let filter = match id {
            Some(id) => Filter::eq(ID_FIELD, id),
            None => Filter::all(),
        };

        self.find(&filter).await
    }

    /// Returns the records matching every clause of `filter`, in store order.
    pub async fn find(&self, filter: &Filter) -> CollectionResult<Vec<Record>> {
        self.backend.find_records(filter, &self.name).await
    }

    /// Stores a new record under a freshly minted identifier and returns it.
    ///
    /// Any `id` in the payload is overwritten before validation.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidObject`] if the record, with its new
    /// identifier, does not satisfy the rule set. Nothing is stored.
    pub async fn create(&self, record: Record) -> CollectionResult<Record> {
        let record = record.with_id(mint_id());
        self.validate(&record)?;

        self.backend
            .insert_records(vec![record.clone()], &self.name)
            .await?;

        Ok(record)
    }

    /// Replaces the record identified by `id` and returns the stored value.
    ///
    /// The stored record's `id` is forced to `id` whatever the payload says.
    /// Validation runs before the lookup, so an invalid payload for an unknown
    /// identifier reports [`CollectionError::InvalidObject`].
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidObject`] if the record fails the rule
    /// set, or [`CollectionError::NotFound`] if no record has that identifier.
    pub async fn update(&self, id: &str, record: Record) -> CollectionResult<Record> {
        let record = record.with_id(id);
        self.validate(&record)?;

        self.backend
            .replace_record(id, record.clone(), &self.name)
            .await?;

        Ok(record)
    }

    /// Removes the record identified by `id` and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::NotFound`] if no record has that identifier.
    pub async fn delete(&self, id: &str) -> CollectionResult<Record> {
        self.backend.remove_record(id, &self.name).await
    }

    /// Bulk-loads records, keeping any string `id` they already carry and
    /// minting one otherwise.
    ///
    /// Every record is validated before any is stored; the load is
    /// all-or-nothing.
    pub async fn seed(&self, records: Vec<Record>) -> CollectionResult<Vec<Record>> {
        let records = records
            .into_iter()
            .map(|record| match record.record_id().map(str::to_owned) {
                Some(id) => record.with_id(id),
                None => record.with_id(mint_id()),
            })
            .map(|record| self.validate(&record).map(|_| record))
            .collect::<CollectionResult<Vec<_>>>()?;

        self.backend
            .insert_records(records.clone(), &self.name)
            .await?;

        Ok(records)
    }

    /// Removes every record in the collection.
    pub async fn clear(&self) -> CollectionResult<()> {
        self.backend.clear_records(&self.name).await
    }

    /// Checks a record against this collection's rule set without storing it.
    pub fn validate(&self, record: &Record) -> CollectionResult<()> {
        check(record, &self.rules).map_err(CollectionError::InvalidObject)
    }
}
