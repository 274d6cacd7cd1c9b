//! MongoDB backend implementation for catalog.
//!
//! This crate provides a MongoDB-based implementation of the `RecordBackend`
//! trait so collections survive process restarts. Each catalog collection maps
//! to one MongoDB collection; the record `id` doubles as the MongoDB `_id`.
//!
//! To use this backend, enable the `mongodb` feature:
//!
//! ```toml
//! [dependencies]
//! catalog = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Example
//!
//! ```ignore
//! use catalog::{backend::RecordBackendBuilder, mongodb::MongoDbStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MongoDbStore::builder("mongodb://localhost:27017", "catalog")
//!         .build()
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as catalog_mongodb;

pub mod escape;
pub mod filter;
pub mod store;

pub use store::{MongoDbStore, MongoDbStoreBuilder};
