//! Record representation and conversion utilities.
//!
//! A record is a BSON document. Once stored it carries a string identifier in
//! the [`ID_FIELD`] field, minted at creation and never changed afterwards.

use bson::{Bson, Document, ser::serialize_to_bson};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    error::{CollectionError, CollectionResult},
    validate::{Kind, Problem, Violation},
};

/// A stored entity: a mapping of field names to BSON values.
pub type Record = Document;

/// Name of the field holding a record's identifier.
pub const ID_FIELD: &str = "id";

/// Mints a fresh record identifier (hyphenated UUID v4).
pub fn mint_id() -> String {
    Uuid::new_v4().to_string()
}

/// Extension trait for identifier handling and format conversion on records.
pub trait RecordExt: Sized {
    /// Returns the record's identifier if it has a string `id` field.
    fn record_id(&self) -> Option<&str>;

    /// Returns the record with `id` set, replacing any existing value.
    fn with_id(self, id: impl Into<String>) -> Self;

    /// Builds a record from a parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidObject`] if the value is not a JSON
    /// object or holds a value BSON cannot represent.
    fn from_json(value: Value) -> CollectionResult<Self>;

    /// Converts the record to relaxed extended JSON.
    fn to_json(&self) -> Value;
}

impl RecordExt for Record {
    fn record_id(&self) -> Option<&str> {
        self.get_str(ID_FIELD).ok()
    }

    fn with_id(mut self, id: impl Into<String>) -> Self {
        self.insert(ID_FIELD, id.into());
        self
    }

    fn from_json(value: Value) -> CollectionResult<Self> {
        if !value.is_object() {
            return Err(CollectionError::InvalidObject(Violation::new(
                "$root",
                Problem::TypeMismatch { expected: Kind::Object },
            )));
        }

        let converted = serialize_to_bson(&value).map_err(|err| {
            CollectionError::InvalidObject(Violation::new("$root", Problem::Unrepresentable(err.to_string())))
        })?;

        match converted {
            Bson::Document(document) => Ok(document),
            other => Err(CollectionError::Serialization(format!(
                "expected a document, got {:?}",
                other.element_type()
            ))),
        }
    }

    fn to_json(&self) -> Value {
        Bson::Document(self.clone()).into_relaxed_extjson()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use serde_json::json;

    #[test]
    fn test_minted_ids_are_distinct_uuids() {
        let first = mint_id();
        let second = mint_id();
        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn test_with_id_overrides_payload_id() {
        let record = doc! { "id": "client-chosen", "name": "mjolnir" }.with_id("server-minted");
        assert_eq!(record.record_id(), Some("server-minted"));
        assert_eq!(record.get_str("name").unwrap(), "mjolnir");
    }

    #[test]
    fn test_record_id_ignores_non_string_ids() {
        assert_eq!(doc! { "id": 38 }.record_id(), None);
        assert_eq!(doc! {}.record_id(), None);
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        let err = Record::from_json(json!(["not", "an", "object"])).unwrap_err();
        assert!(matches!(err, CollectionError::InvalidObject(_)));
    }

    #[test]
    fn test_from_json_rejects_integers_past_i64() {
        let err = Record::from_json(json!({ "n": u64::MAX })).unwrap_err();
        match err {
            CollectionError::InvalidObject(violation) => {
                assert!(matches!(violation.problem, Problem::Unrepresentable(_)));
            }
            other => panic!("expected InvalidObject, got {other:?}"),
        }
    }

    #[test]
    fn test_json_conversion_keeps_plain_values() {
        let value = json!({ "name": "Sue", "age": 30, "tags": ["a", "b"], "hair": { "color": "brown" } });
        let record = Record::from_json(value.clone()).unwrap();

        assert_eq!(record.get_str("name").unwrap(), "Sue");
        assert!(record.get_array("tags").is_ok());
        assert_eq!(record.to_json(), value);
    }
}
