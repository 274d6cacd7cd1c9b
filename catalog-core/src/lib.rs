//! Schema-validated record collections over pluggable storage backends.
//!
//! This crate is the core of the catalog project and provides:
//!
//! - **Records** ([`record`]) - BSON documents keyed by a minted string identifier
//! - **Rule sets** ([`rules`]) - Declarative field rules with nested objects and typed arrays
//! - **Validation** ([`validate`]) - Primitive kind predicates and the recursive rule-set validator
//! - **Filtering** ([`filter`]) - Exact-match equality filters and a visitor for backends
//! - **Backend abstraction** ([`backend`]) - The trait every record store implements
//! - **Collections** ([`collection`]) - Validation-gated get/create/update/delete
//! - **Listings** ([`listing`]) - The `{count, results}` envelope returned by list endpoints
//! - **Error handling** ([`error`]) - Error kinds callers can branch on
//!
//! # Example
//!
//! ```ignore
//! use catalog_core::{collection::Collection, record::RecordExt, rules::{RuleSet, FieldRule}, validate::Kind};
//! use bson::doc;
//!
//! let rules = RuleSet::new()
//!     .field("name", FieldRule::required(Kind::String))
//!     .field("age", FieldRule::required(Kind::Number));
//!
//! let people = Collection::new("people", rules, backend);
//! let sue = people.create(doc! { "name": "Sue", "age": 30 }).await?;
//! assert_eq!(people.get(Some(sue.record_id().unwrap())).await?.len(), 1);
//! ```

#[allow(unused_extern_crates)]
extern crate self as catalog_core;

pub mod backend;
pub mod collection;
pub mod error;
pub mod filter;
pub mod listing;
pub mod record;
pub mod rules;
pub mod validate;
