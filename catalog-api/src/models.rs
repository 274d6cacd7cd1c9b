//! Built-in models and the registry the routes resolve `{model}` against.

use std::collections::BTreeMap;

use catalog::{
    backend::SharedBackend,
    collection::{Collection, DynCollection},
    rules::{FieldRule, RuleSet},
    validate::Kind,
};

pub fn category_rules() -> RuleSet {
    RuleSet::new()
        .field("id", FieldRule::required(Kind::String))
        .field("name", FieldRule::required(Kind::String))
        .field("display_name", FieldRule::required(Kind::String))
        .field("description", FieldRule::optional(Kind::String))
}

pub fn product_rules() -> RuleSet {
    RuleSet::new()
        .field("id", FieldRule::required(Kind::String))
        .field("category", FieldRule::required(Kind::String))
        .field("name", FieldRule::required(Kind::String))
        .field("display_name", FieldRule::optional(Kind::String))
        .field("description", FieldRule::optional(Kind::String))
}

pub fn todo_rules() -> RuleSet {
    RuleSet::new()
        .field("id", FieldRule::required(Kind::String))
        .field("assignee", FieldRule::required(Kind::String))
        .field("complete", FieldRule::required(Kind::Boolean))
        .field("difficulty", FieldRule::required(Kind::Number))
        .field("text", FieldRule::required(Kind::String))
}

/// Maps model names to collections over one shared backend.
#[derive(Debug, Clone)]
pub struct Models {
    collections: BTreeMap<String, DynCollection>,
    backend: SharedBackend,
}

impl Models {
    /// Creates an empty registry over `backend`.
    pub fn empty(backend: SharedBackend) -> Self {
        Self {
            collections: BTreeMap::new(),
            backend,
        }
    }

    /// Creates the registry of built-in models: `categories`, `products` and `todo`.
    pub fn builtin(backend: SharedBackend) -> Self {
        Self::empty(backend)
            .register("categories", category_rules())
            .register("products", product_rules())
            .register("todo", todo_rules())
    }

    /// Adds (or replaces) a model backed by the shared backend.
    pub fn register(mut self, name: &str, rules: RuleSet) -> Self {
        let collection = Collection::new(name, rules, self.backend.clone());
        self.collections.insert(name.to_string(), collection);
        self
    }

    pub fn get(&self, name: &str) -> Option<&DynCollection> {
        self.collections.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    pub fn backend(&self) -> &SharedBackend {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{bson::doc, memory::InMemoryStore, validate::is_valid};
    use std::sync::Arc;

    #[test]
    fn test_builtin_models() {
        let models = Models::builtin(Arc::new(InMemoryStore::new()));
        assert_eq!(models.names().collect::<Vec<_>>(), vec!["categories", "products", "todo"]);
        assert!(models.get("favorites").is_none());
    }

    #[test]
    fn test_todo_rules() {
        let todo = doc! {
            "id": "t1",
            "assignee": "Sue",
            "complete": false,
            "difficulty": 3,
            "text": "water the plants",
        };
        assert!(is_valid(&todo, &todo_rules()));

        let mut unfinished = todo.clone();
        unfinished.insert("complete", "no");
        assert!(!is_valid(&unfinished, &todo_rules()));
    }

    #[test]
    fn test_category_requires_display_name() {
        let category = doc! { "id": "c1", "name": "weapons" };
        assert!(!is_valid(&category, &category_rules()));
        assert!(is_valid(&doc! { "id": "c1", "name": "weapons", "display_name": "Weapons" }, &category_rules()));
    }
}
