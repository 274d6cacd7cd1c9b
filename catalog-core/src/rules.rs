//! Declarative rule sets describing the fields a collection accepts.
//!
//! A [`RuleSet`] is an ordered whitelist of checks: each named field carries a
//! [`FieldRule`] saying whether it is required and what [`Shape`] its value
//! must have. Fields a record carries beyond the rule set are not rejected.
//!
//! Rule sets are usually built in code:
//!
//! ```ignore
//! use catalog_core::rules::{RuleSet, FieldRule};
//! use catalog_core::validate::Kind;
//!
//! let rules = RuleSet::new()
//!     .field("name", FieldRule::required(Kind::String))
//!     .field("hair", FieldRule::required_object(
//!         RuleSet::new().field("color", FieldRule::required(Kind::String)),
//!     ))
//!     .field("children", FieldRule::optional_array_of(Kind::String));
//! ```
//!
//! They can also be parsed from the declarative document form, where `type`,
//! `required` and `valueType` are rule keywords and every other key of an
//! `object` rule is a nested field rule:
//!
//! ```ignore
//! let rules = RuleSet::parse(&doc! {
//!     "name": { "type": "string", "required": true },
//!     "hair": { "type": "object", "color": { "type": "string", "required": true } },
//!     "children": { "type": "array", "valueType": "string" },
//! })?;
//! ```

use bson::{Bson, Document};

use crate::{
    error::{CollectionError, CollectionResult},
    validate::Kind,
};

const TYPE_KEY: &str = "type";
const REQUIRED_KEY: &str = "required";
const VALUE_TYPE_KEY: &str = "valueType";

/// The structural check a field rule applies to a present value.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// The value must be of the given kind.
    Primitive(Kind),
    /// The value must be an array; when an element kind is given, so must every element.
    Array(Option<Kind>),
    /// The value must be an object and satisfy the nested rules.
    Object(RuleSet),
}

impl Shape {
    /// The kind the value itself must match.
    pub fn kind(&self) -> Kind {
        match self {
            Shape::Primitive(kind) => *kind,
            Shape::Array(_) => Kind::Array,
            Shape::Object(_) => Kind::Object,
        }
    }
}

/// A single field's rule.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    pub required: bool,
    pub shape: Shape,
}

impl FieldRule {
    pub fn new(shape: Shape, required: bool) -> Self {
        Self { required, shape }
    }

    pub fn required(kind: Kind) -> Self {
        Self::new(Shape::Primitive(kind), true)
    }

    pub fn optional(kind: Kind) -> Self {
        Self::new(Shape::Primitive(kind), false)
    }

    pub fn required_object(fields: RuleSet) -> Self {
        Self::new(Shape::Object(fields), true)
    }

    pub fn optional_object(fields: RuleSet) -> Self {
        Self::new(Shape::Object(fields), false)
    }

    pub fn required_array_of(element: Kind) -> Self {
        Self::new(Shape::Array(Some(element)), true)
    }

    pub fn optional_array_of(element: Kind) -> Self {
        Self::new(Shape::Array(Some(element)), false)
    }
}

/// Ordered mapping from field name to [`FieldRule`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    fields: Vec<(String, FieldRule)>,
}

impl RuleSet {
    /// Creates an empty rule set, which every record satisfies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the rule for `name`, keeping declaration order.
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = rule,
            None => self.fields.push((name, rule)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, rule)| rule)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parses the declarative document form of a rule set.
    ///
    /// # Errors
    ///
    /// Returns [`CollectionError::InvalidRuleSet`] if a rule is not a document,
    /// lacks a known `type`, has a non-boolean `required`, puts `valueType` on
    /// a non-array, or nests field rules under a non-object type.
    pub fn parse(document: &Document) -> CollectionResult<Self> {
        parse_fields(document, "")
    }
}

fn parse_fields(document: &Document, prefix: &str) -> CollectionResult<RuleSet> {
    let mut rules = RuleSet::new();

    for (name, value) in document {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{prefix}.{name}")
        };
        rules = rules.field(name.as_str(), parse_rule(value, &path)?);
    }

    Ok(rules)
}

fn parse_rule(value: &Bson, path: &str) -> CollectionResult<FieldRule> {
    let rule = value
        .as_document()
        .ok_or_else(|| invalid(path, "rule must be a document"))?;

    let kind = rule
        .get_str(TYPE_KEY)
        .map_err(|_| invalid(path, "missing string 'type'"))?
        .parse::<Kind>()
        .map_err(|e| invalid(path, &e))?;

    let required = match rule.get(REQUIRED_KEY) {
        None => false,
        Some(Bson::Boolean(required)) => *required,
        Some(_) => return Err(invalid(path, "'required' must be a boolean")),
    };

    let value_type = match rule.get(VALUE_TYPE_KEY) {
        None => None,
        Some(_) if kind != Kind::Array => {
            return Err(invalid(path, "'valueType' is only allowed on arrays"));
        }
        Some(Bson::String(element)) => Some(element.parse::<Kind>().map_err(|e| invalid(path, &e))?),
        Some(_) => return Err(invalid(path, "'valueType' must be a string")),
    };

    let nested = rule
        .iter()
        .filter(|(key, _)| ![TYPE_KEY, REQUIRED_KEY, VALUE_TYPE_KEY].contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect::<Document>();

    let shape = match kind {
        Kind::Object => Shape::Object(parse_fields(&nested, path)?),
        _ if !nested.is_empty() => {
            return Err(invalid(path, "nested field rules require type 'object'"));
        }
        Kind::Array => Shape::Array(value_type),
        other => Shape::Primitive(other),
    };

    Ok(FieldRule::new(shape, required))
}

fn invalid(path: &str, reason: &str) -> CollectionError {
    CollectionError::InvalidRuleSet(format!("{path}: {reason}"))
}
