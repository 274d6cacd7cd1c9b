//! Exact-match equality filters over record fields.
//!
//! A [`Filter`] is a conjunction of `field == value` clauses. An empty filter
//! matches every record. Backends evaluate filters through [`FilterVisitor`]:
//! the in-memory store walks them into a boolean per record, the MongoDB store
//! translates them into a query document.
//!
//! ```ignore
//! use catalog_core::filter::Filter;
//!
//! let filter = Filter::eq("category", "mythical_weapons").and_eq("name", "mjolnir");
//! ```

use bson::Bson;

/// One `field == value` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub field: String,
    pub value: Bson,
}

/// A conjunction of equality clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<Clause>,
}

impl Filter {
    /// Creates a filter that matches every record.
    pub fn all() -> Self {
        Self::default()
    }

    /// Creates a filter with a single equality clause.
    pub fn eq(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Self::all().and_eq(field, value)
    }

    /// Adds an equality clause; every clause must hold for a record to match.
    pub fn and_eq(mut self, field: impl Into<String>, value: impl Into<Bson>) -> Self {
        self.clauses.push(Clause {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Filter
where
    K: Into<String>,
    V: Into<Bson>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Filter::all(), |filter, (field, value)| filter.and_eq(field, value))
    }
}

/// Visitor trait for evaluating or translating a [`Filter`].
pub trait FilterVisitor {
    type Output;
    type Error;

    /// Visits the whole conjunction. The default combines clauses with
    /// [`FilterVisitor::combine`].
    fn visit_filter(&mut self, filter: &Filter) -> Result<Self::Output, Self::Error> {
        let outputs = filter
            .clauses()
            .iter()
            .map(|clause| self.visit_eq(&clause.field, &clause.value))
            .collect::<Result<Vec<_>, _>>()?;

        self.combine(outputs)
    }

    /// Visits a single `field == value` clause.
    fn visit_eq(&mut self, field: &str, value: &Bson) -> Result<Self::Output, Self::Error>;

    /// Combines the outputs of every clause (logical AND).
    fn combine(&mut self, outputs: Vec<Self::Output>) -> Result<Self::Output, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_clauses_in_order() {
        let filter = Filter::eq("category", "weapons").and_eq("name", "mjolnir");
        let fields = filter
            .clauses()
            .iter()
            .map(|clause| clause.field.as_str())
            .collect::<Vec<_>>();

        assert_eq!(fields, vec!["category", "name"]);
        assert_eq!(filter.clauses()[1].value, Bson::String("mjolnir".into()));
    }

    #[test]
    fn test_collects_from_query_pairs() {
        let pairs = vec![("name".to_string(), "gungnir".to_string())];
        let filter = pairs.into_iter().collect::<Filter>();
        assert_eq!(filter, Filter::eq("name", "gungnir"));
        assert!(Filter::all().is_empty());
    }

    struct ClauseCounter;

    impl FilterVisitor for ClauseCounter {
        type Output = usize;
        type Error = ();

        fn visit_eq(&mut self, _field: &str, _value: &Bson) -> Result<usize, ()> {
            Ok(1)
        }

        fn combine(&mut self, outputs: Vec<usize>) -> Result<usize, ()> {
            Ok(outputs.into_iter().sum())
        }
    }

    #[test]
    fn test_visitor_sees_every_clause() {
        let filter = Filter::eq("a", 1).and_eq("b", 2).and_eq("c", 3);
        assert_eq!(ClauseCounter.visit_filter(&filter), Ok(3));
    }
}
