//! Convenient re-exports of commonly used types from catalog.
//!
//! ```ignore
//! use catalog::prelude::*;
//! ```

pub use catalog_core::{
    backend::{RecordBackend, RecordBackendBuilder, SharedBackend},
    collection::{Collection, DynCollection},
    error::{CollectionError, CollectionResult},
    filter::{Clause, Filter, FilterVisitor},
    listing::Listing,
    record::{ID_FIELD, Record, RecordExt, mint_id},
    rules::{FieldRule, RuleSet, Shape},
    validate::{Kind, Problem, Violation, check, is_valid},
};
