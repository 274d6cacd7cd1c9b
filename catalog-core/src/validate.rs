//! Type predicates and rule-set validation for records.
//!
//! Validation semantics:
//! - A required field must be present
//! - A present field must match its rule's kind (`null` matches no kind)
//! - Object rules with nested fields are applied recursively
//! - Array rules with an element kind check every element
//! - Fields the rule set does not mention are ignored
//!
//! Arrays are objects: [`is_object`] accepts both documents and arrays, so an
//! array value passes an `object` rule and is then checked as a document with
//! no fields.

use bson::{Bson, Document};
use std::{fmt, str::FromStr};

use crate::rules::{FieldRule, RuleSet, Shape};

/// Primitive value kinds a field rule can demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Number,
    Array,
    Object,
    Boolean,
    Function,
}

impl Kind {
    /// Returns the lowercase name used in declarative rule sets.
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Array => "array",
            Kind::Object => "object",
            Kind::Boolean => "boolean",
            Kind::Function => "function",
        }
    }

    /// Returns true if `value` is of this kind.
    pub fn matches(&self, value: &Bson) -> bool {
        match self {
            Kind::String => is_string(value),
            Kind::Number => is_number(value),
            Kind::Array => is_array(value),
            Kind::Object => is_object(value),
            Kind::Boolean => is_boolean(value),
            Kind::Function => is_function(value),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(Kind::String),
            "number" => Ok(Kind::Number),
            "array" => Ok(Kind::Array),
            "object" => Ok(Kind::Object),
            "boolean" => Ok(Kind::Boolean),
            "function" => Ok(Kind::Function),
            other => Err(format!("unknown type '{other}'")),
        }
    }
}

pub fn is_string(value: &Bson) -> bool {
    matches!(value, Bson::String(_))
}

pub fn is_number(value: &Bson) -> bool {
    matches!(
        value,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_)
    )
}

pub fn is_array(value: &Bson) -> bool {
    matches!(value, Bson::Array(_))
}

/// Returns true for documents and for arrays.
pub fn is_object(value: &Bson) -> bool {
    matches!(value, Bson::Document(_) | Bson::Array(_))
}

pub fn is_boolean(value: &Bson) -> bool {
    matches!(value, Bson::Boolean(_))
}

pub fn is_function(value: &Bson) -> bool {
    matches!(value, Bson::JavaScriptCode(_) | Bson::JavaScriptCodeWithScope(_))
}

/// What went wrong with a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// A required field is absent.
    Missing,
    /// The field is present but not of the expected kind.
    TypeMismatch { expected: Kind },
    /// An array element is not of the rule's element kind.
    ElementMismatch { index: usize, expected: Kind },
    /// The value has no BSON representation, such as an integer past `i64::MAX`.
    Unrepresentable(String),
}

/// The first rule a record failed, with the dotted path of the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub problem: Problem,
}

impl Violation {
    pub fn new(path: impl Into<String>, problem: Problem) -> Self {
        Self { path: path.into(), problem }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            Problem::Missing => write!(f, "{}: required field missing", self.path),
            Problem::TypeMismatch { expected } => {
                write!(f, "{}: expected {}", self.path, expected)
            }
            Problem::ElementMismatch { index, expected } => {
                write!(f, "{}[{}]: expected {}", self.path, index, expected)
            }
            Problem::Unrepresentable(reason) => write!(f, "{}: {}", self.path, reason),
        }
    }
}

/// Returns true if `record` satisfies every rule in `rules`.
pub fn is_valid(record: &Document, rules: &RuleSet) -> bool {
    check(record, rules).is_ok()
}

/// Validates `record` against `rules`, reporting the first failing field.
pub fn check(record: &Document, rules: &RuleSet) -> Result<(), Violation> {
    check_fields(|name| record.get(name), rules, "")
}

/// Walks the rule set in declaration order; `lookup` abstracts over a document
/// and an array standing in for one (which has no fields).
fn check_fields<'a>(
    lookup: impl Fn(&str) -> Option<&'a Bson>,
    rules: &RuleSet,
    prefix: &str,
) -> Result<(), Violation> {
    for (name, rule) in rules.iter() {
        let path = make_path(prefix, name);

        match lookup(name) {
            Some(value) => check_value(value, rule, &path)?,
            None if rule.required => return Err(Violation::new(path, Problem::Missing)),
            None => {}
        }
    }

    Ok(())
}

fn check_value(value: &Bson, rule: &FieldRule, path: &str) -> Result<(), Violation> {
    let expected = rule.shape.kind();
    if !expected.matches(value) {
        return Err(Violation::new(path, Problem::TypeMismatch { expected }));
    }

    match (&rule.shape, value) {
        (Shape::Object(nested), Bson::Document(document)) => {
            check_fields(|name| document.get(name), nested, path)
        }
        (Shape::Object(nested), _) => check_fields(|_| None, nested, path),
        (Shape::Array(Some(element)), Bson::Array(items)) => {
            match items.iter().position(|item| !element.matches(item)) {
                Some(index) => Err(Violation::new(
                    path,
                    Problem::ElementMismatch { index, expected: *element },
                )),
                None => Ok(()),
            }
        }
        _ => Ok(()),
    }
}

fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{JavaScriptCodeWithScope, doc};

    fn samples() -> Vec<(Kind, Bson)> {
        vec![
            (Kind::String, Bson::String("yes".into())),
            (Kind::Number, Bson::Int32(1)),
            (Kind::Array, Bson::Array(vec![Bson::String("a".into())])),
            (Kind::Object, Bson::Document(doc! { "x": "y" })),
            (Kind::Function, Bson::JavaScriptCode("() => {}".into())),
            (Kind::Boolean, Bson::Boolean(false)),
        ]
    }

    #[test]
    fn test_each_predicate_accepts_only_its_kind() {
        for kind in [Kind::String, Kind::Number, Kind::Boolean, Kind::Function] {
            for (sample_kind, value) in samples() {
                assert_eq!(kind.matches(&value), kind == sample_kind, "{kind} vs {sample_kind}");
            }
        }
    }

    #[test]
    fn test_arrays_are_objects() {
        for (sample_kind, value) in samples() {
            let expected = matches!(sample_kind, Kind::Array | Kind::Object);
            assert_eq!(is_object(&value), expected, "is_object({sample_kind})");
            assert_eq!(is_array(&value), sample_kind == Kind::Array, "is_array({sample_kind})");
        }
    }

    #[test]
    fn test_predicates_are_total_over_empty_values() {
        for value in [Bson::Null, Bson::Undefined] {
            for (kind, _) in samples() {
                assert!(!kind.matches(&value));
            }
        }
    }

    #[test]
    fn test_numeric_variants_and_scoped_code() {
        assert!(is_number(&Bson::Int64(7)));
        assert!(is_number(&Bson::Double(f64::NAN)));
        assert!(is_function(&Bson::JavaScriptCodeWithScope(JavaScriptCodeWithScope {
            code: "x".into(),
            scope: doc! {},
        })));
    }

    #[test]
    fn test_kind_names_round_trip() {
        for (kind, _) in samples() {
            assert_eq!(kind.as_str().parse::<Kind>(), Ok(kind));
        }
        assert!("integer".parse::<Kind>().is_err());
    }

    fn person_rules() -> RuleSet {
        RuleSet::new()
            .field("id", FieldRule::required(Kind::String))
            .field("name", FieldRule::required(Kind::String))
            .field("age", FieldRule::required(Kind::Number))
            .field(
                "hair",
                FieldRule::required_object(
                    RuleSet::new()
                        .field("color", FieldRule::required(Kind::String))
                        .field("style", FieldRule::required(Kind::String)),
                ),
            )
            .field("children", FieldRule::optional_array_of(Kind::String))
    }

    #[test]
    fn test_complete_person_is_valid() {
        let susan = doc! {
            "id": "123-45-6789",
            "name": "Susan McDeveloperson",
            "age": 37,
            "hair": { "color": "brown", "style": "long" },
            "children": [],
        };
        assert!(is_valid(&susan, &person_rules()));

        let fred = doc! {
            "id": "321-94-9843",
            "name": "Freddy McCoder",
            "age": 44,
            "hair": { "style": "short", "color": "black" },
            "children": ["Bob", "Tom", "Sue"],
        };
        assert!(is_valid(&fred, &person_rules()));
    }

    #[test]
    fn test_empty_nested_object_fails_required_nested_fields() {
        let record = doc! {
            "id": "123-45-6789",
            "name": "Susan Nullhair",
            "age": 66,
            "hair": {},
            "children": [],
        };
        assert_eq!(
            check(&record, &person_rules()),
            Err(Violation::new("hair.color", Problem::Missing))
        );
    }

    #[test]
    fn test_partial_nested_object_fails() {
        let record = doc! {
            "id": "123-45-6789",
            "name": "Susan Baldie",
            "age": 66,
            "hair": { "style": "bald" },
        };
        assert!(!is_valid(&record, &person_rules()));
    }

    #[test]
    fn test_wrong_type_and_missing_field_fail() {
        let record = doc! {
            "id": 38,
            "name": "Freddy McCoder",
            "hair": { "style": "short", "color": "black" },
        };
        assert_eq!(
            check(&record, &person_rules()),
            Err(Violation::new("id", Problem::TypeMismatch { expected: Kind::String }))
        );
    }

    #[test]
    fn test_array_element_mismatch_fails() {
        let record = doc! {
            "id": "321-94-9843",
            "name": "Freddy McCoder",
            "age": 44,
            "hair": { "style": "short", "color": "black" },
            "children": ["Bob", 123, "Sue"],
        };
        assert_eq!(
            check(&record, &person_rules()),
            Err(Violation::new(
                "children",
                Problem::ElementMismatch { index: 1, expected: Kind::String }
            ))
        );
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let rules = RuleSet::new()
            .field("name", FieldRule::required(Kind::String))
            .field("age", FieldRule::required(Kind::Number));

        assert!(is_valid(&doc! { "name": "Sue", "age": 30, "nickname": "Suzy" }, &rules));
        assert!(!is_valid(&doc! { "name": "Sue" }, &rules));
    }

    #[test]
    fn test_optional_fields_may_be_absent_but_not_null() {
        let rules = RuleSet::new().field("description", FieldRule::optional(Kind::String));

        assert!(is_valid(&doc! {}, &rules));
        assert!(!is_valid(&doc! { "description": Bson::Null }, &rules));
    }

    #[test]
    fn test_array_passes_object_rule_without_fields() {
        let required_nested = RuleSet::new().field(
            "hair",
            FieldRule::optional_object(RuleSet::new().field("color", FieldRule::required(Kind::String))),
        );
        let optional_nested = RuleSet::new().field(
            "hair",
            FieldRule::optional_object(RuleSet::new().field("color", FieldRule::optional(Kind::String))),
        );
        let record = doc! { "hair": ["brown"] };

        assert!(!is_valid(&record, &required_nested));
        assert!(is_valid(&record, &optional_nested));
    }

    #[test]
    fn test_array_of_arrays_matches_object_element_kind() {
        let rules = RuleSet::new().field("grid", FieldRule::optional_array_of(Kind::Object));
        assert!(is_valid(&doc! { "grid": [[1, 2], { "x": 1 }] }, &rules));
        assert!(!is_valid(&doc! { "grid": [[1, 2], 3] }, &rules));
    }

    #[test]
    fn test_violation_display_names_the_path() {
        let violation = Violation::new(
            "children",
            Problem::ElementMismatch { index: 1, expected: Kind::String },
        );
        assert_eq!(violation.to_string(), "children[1]: expected string");
    }
}
