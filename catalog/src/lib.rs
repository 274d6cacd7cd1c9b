//! Main catalog crate: schema-validated record collections over pluggable
//! storage backends.
//!
//! This crate re-exports the core types from `catalog-core` and gives access
//! to the bundled backends. Records are BSON documents; each collection checks
//! them against a declarative [`RuleSet`](rules::RuleSet) before anything is
//! written.
//!
//! # Quick Start
//!
//! ```ignore
//! use catalog::{prelude::*, memory::InMemoryStore};
//! use catalog::bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> CollectionResult<()> {
//!     let rules = RuleSet::new()
//!         .field("name", FieldRule::required(Kind::String))
//!         .field("hair", FieldRule::required_object(
//!             RuleSet::new().field("color", FieldRule::required(Kind::String)),
//!         ));
//!
//!     let people = Collection::new("people", rules, InMemoryStore::builder().build().await?);
//!
//!     let sue = people.create(doc! { "name": "Sue", "hair": { "color": "brown" } }).await?;
//!     let id = sue.record_id().unwrap();
//!
//!     people.update(id, doc! { "name": "Susan", "hair": { "color": "grey" } }).await?;
//!     println!("{:?}", people.find(&Filter::eq("name", "Susan")).await?);
//!
//!     people.delete(id).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! When the backend is chosen at runtime, share one [`SharedBackend`](backend::SharedBackend)
//! between [`DynCollection`](collection::DynCollection)s:
//!
//! ```ignore
//! use std::sync::Arc;
//! use catalog::{prelude::*, memory::InMemoryStore};
//!
//! let backend: SharedBackend = Arc::new(InMemoryStore::new());
//! let products: DynCollection = Collection::new("products", product_rules, backend.clone());
//! let categories: DynCollection = Collection::new("categories", category_rules, backend);
//! ```
//!
//! # Backends
//!
//! - [`memory`] - In-process storage for development and testing
//! - [`mongodb`] - Persistent MongoDB backend (requires `mongodb` feature)

pub mod prelude;

pub use catalog_core::{backend, collection, error, filter, listing, record, rules, validate};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use catalog_memory::{InMemoryStore, InMemoryStoreBuilder};
}

/// MongoDB storage backend implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use catalog_mongodb::{MongoDbStore, MongoDbStoreBuilder};
}
