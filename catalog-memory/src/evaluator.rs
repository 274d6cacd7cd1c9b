//! Equality filter evaluation for in-memory record matching.

use std::{collections::HashMap, convert::Infallible};

use bson::{Bson, Document};

use catalog_core::filter::{Filter, FilterVisitor};

/// Comparable view of a BSON value.
///
/// Numbers of every width are normalized to `f64` so `Int32(3)` equals
/// `Double(3.0)`. Strings never equal numbers.
#[derive(Debug)]
pub(crate) enum Comparable<'a> {
    Null,
    Bool(bool),
    Number(f64),
    String(&'a str),
    Array(Vec<Comparable<'a>>),
    Map(HashMap<&'a str, Comparable<'a>>),
    /// Any other BSON value, compared structurally.
    Opaque(&'a Bson),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Number(*value as f64),
            Bson::Int64(value) => Comparable::Number(*value as f64),
            Bson::Double(value) => Comparable::Number(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Array(arr) => Comparable::Array(arr.iter().map(Comparable::from).collect()),
            Bson::Document(doc) => Comparable::Map(
                doc.iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect(),
            ),
            other => Comparable::Opaque(other),
        }
    }
}

impl PartialEq for Comparable<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Number(a), Comparable::Number(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            (Comparable::Opaque(a), Comparable::Opaque(b)) => a == b,
            _ => false,
        }
    }
}

/// Decides whether one record satisfies a [`Filter`].
pub(crate) struct RecordEvaluator<'a> {
    record: &'a Document,
}

impl<'a> RecordEvaluator<'a> {
    pub fn new(record: &'a Document) -> Self {
        Self { record }
    }

    pub fn matches(record: &'a Document, filter: &Filter) -> bool {
        match RecordEvaluator::new(record).visit_filter(filter) {
            Ok(matched) => matched,
            Err(never) => match never {},
        }
    }

    pub fn filter_records(records: impl IntoIterator<Item = &'a Document>, filter: &Filter) -> Vec<Document> {
        records
            .into_iter()
            .filter(|record| RecordEvaluator::matches(record, filter))
            .cloned()
            .collect()
    }
}

impl FilterVisitor for RecordEvaluator<'_> {
    type Output = bool;
    type Error = Infallible;

    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<bool, Infallible> {
        Ok(match self.record.get(field) {
            Some(field_value) => Comparable::from(field_value) == Comparable::from(value),
            None => false,
        })
    }

    fn combine(&mut self, outputs: Vec<bool>) -> Result<bool, Infallible> {
        Ok(outputs.into_iter().all(|matched| matched))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId};

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(RecordEvaluator::matches(&doc! {}, &Filter::all()));
    }

    #[test]
    fn test_every_clause_must_hold() {
        let record = doc! { "name": "mjolnir", "category": "weapons" };

        assert!(RecordEvaluator::matches(&record, &Filter::eq("name", "mjolnir").and_eq("category", "weapons")));
        assert!(!RecordEvaluator::matches(&record, &Filter::eq("name", "mjolnir").and_eq("category", "armor")));
        assert!(!RecordEvaluator::matches(&record, &Filter::eq("missing", "mjolnir")));
    }

    #[test]
    fn test_numbers_normalize_but_never_equal_strings() {
        let record = doc! { "price": 10_i32 };

        assert!(RecordEvaluator::matches(&record, &Filter::eq("price", 10.0_f64)));
        assert!(RecordEvaluator::matches(&record, &Filter::eq("price", 10_i64)));
        assert!(!RecordEvaluator::matches(&record, &Filter::eq("price", "10")));
    }

    #[test]
    fn test_nested_values_compare_structurally() {
        let oid = ObjectId::new();
        let record = doc! { "hair": { "color": "brown", "style": "short" }, "tags": [1, 2], "ref": oid };

        assert!(RecordEvaluator::matches(&record, &Filter::eq("hair", doc! { "style": "short", "color": "brown" })));
        assert!(RecordEvaluator::matches(&record, &Filter::eq("tags", vec![Bson::Int64(1), Bson::Double(2.0)])));
        assert!(RecordEvaluator::matches(&record, &Filter::eq("ref", oid)));
    }
}
