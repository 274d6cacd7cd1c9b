//! Error types and result types for collection operations.
//!
//! Every fallible operation in this crate returns [`CollectionResult<T>`]. The
//! variants are distinct kinds so callers branch on the variant, never on the
//! message text.

use bson::error::Error as BsonError;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

use crate::validate::Violation;

/// Represents all possible errors that can occur when working with a collection.
#[derive(Error, Debug)]
pub enum CollectionError {
    /// The record failed its collection's rule set. Nothing was written.
    ///
    /// The [`Violation`] names the first failing field; the message stays
    /// `Invalid object` for callers that surface it verbatim.
    #[error("Invalid object")]
    InvalidObject(Violation),
    /// No record with the given identifier exists.
    /// The first argument is the record ID, the second is the collection name.
    #[error("ID not found")]
    NotFound(String, String),
    /// A record with the given identifier is already stored.
    /// The first argument is the record ID, the second is the collection name.
    #[error("Record {0} already exists in collection {1}")]
    DuplicateId(String, String),
    /// A declarative rule set could not be parsed.
    #[error("Invalid rule set: {0}")]
    InvalidRuleSet(String),
    /// Serialization/deserialization error when converting between BSON and JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Error during backend initialization or connection setup.
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// An error occurred in the underlying storage backend.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// A specialized `Result` type for collection operations.
pub type CollectionResult<T> = Result<T, CollectionError>;

impl From<BsonError> for CollectionError {
    fn from(err: BsonError) -> Self {
        CollectionError::Serialization(err.to_string())
    }
}

impl From<SerdeJsonError> for CollectionError {
    fn from(err: SerdeJsonError) -> Self {
        CollectionError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{Problem, Violation};

    #[test]
    fn test_caller_facing_messages() {
        let invalid = CollectionError::InvalidObject(Violation::new("name", Problem::Missing));
        assert_eq!(invalid.to_string(), "Invalid object");

        let missing = CollectionError::NotFound("abc".into(), "products".into());
        assert_eq!(missing.to_string(), "ID not found");
    }

    #[test]
    fn test_serde_json_error_becomes_serialization() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(CollectionError::from(err), CollectionError::Serialization(_)));
    }
}
