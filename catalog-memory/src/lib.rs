//! In-memory record storage backend for catalog.
//!
//! This crate provides a thread-safe, in-memory implementation of the
//! `RecordBackend` trait. Records live in insertion order per collection
//! behind an async-aware read-write lock, which makes it the default backend
//! for development, tests and the bundled API server.
//!
//! # Quick Start
//!
//! ```ignore
//! use catalog::{Collection, memory::InMemoryStore, backend::RecordBackendBuilder};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backend = InMemoryStore::builder().build().await?;
//!     let products = Collection::new("products", rules, backend);
//!
//!     products.create(doc! { "name": "mjolnir" }).await?;
//!     assert_eq!(products.get(None).await?.len(), 1);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as catalog_memory;

pub mod evaluator;
pub mod store;

pub use store::{InMemoryStore, InMemoryStoreBuilder};
