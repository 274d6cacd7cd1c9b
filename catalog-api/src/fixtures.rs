//! Seeding collections from a JSON fixture file.
//!
//! A fixture file maps model names to arrays of records:
//!
//! ```json
//! { "categories": [{ "name": "weapons", "display_name": "Weapons" }],
//!   "products": [{ "category": "weapons", "name": "mjolnir" }] }
//! ```

use std::path::Path;

use serde_json::{Map, Value};

use catalog::record::{Record, RecordExt};

use crate::{
    error::{ApiError, ApiResult},
    models::Models,
};

/// Reads `path` and seeds every listed model. Returns the number of records loaded.
pub async fn load_fixtures(path: &Path, models: &Models) -> ApiResult<usize> {
    let text = tokio::fs::read_to_string(path).await?;
    let fixtures = serde_json::from_str::<Map<String, Value>>(&text)
        .map_err(|e| ApiError::Fixtures(format!("{}: {e}", path.display())))?;

    seed_fixtures(fixtures, models).await
}

/// Seeds parsed fixtures. Each model's records load all-or-nothing.
pub async fn seed_fixtures(fixtures: Map<String, Value>, models: &Models) -> ApiResult<usize> {
    let mut loaded = 0;

    for (model, records) in fixtures {
        let collection = models
            .get(&model)
            .ok_or_else(|| ApiError::Fixtures(format!("unknown model '{model}'")))?;

        let Value::Array(records) = records else {
            return Err(ApiError::Fixtures(format!("'{model}' must be an array of records")));
        };

        let records = records
            .into_iter()
            .map(Record::from_json)
            .collect::<Result<Vec<_>, _>>()?;

        let seeded = collection.seed(records).await?;
        tracing::info!(model = %model, count = seeded.len(), "seeded fixtures");
        loaded += seeded.len();
    }

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{error::CollectionError, memory::InMemoryStore};
    use serde_json::json;
    use std::sync::Arc;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[tokio::test]
    async fn test_seeds_known_models() {
        let models = Models::builtin(Arc::new(InMemoryStore::new()));
        let fixtures = as_map(json!({
            "categories": [{ "id": "weapons", "name": "weapons", "display_name": "Weapons" }],
            "products": [
                { "category": "weapons", "name": "mjolnir" },
                { "category": "weapons", "name": "gungnir" },
            ],
        }));

        assert_eq!(seed_fixtures(fixtures, &models).await.unwrap(), 3);

        let categories = models.get("categories").unwrap();
        assert_eq!(categories.get(Some("weapons")).await.unwrap().len(), 1);
        assert_eq!(models.get("products").unwrap().get(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_rejects_unknown_models_and_shapes() {
        let models = Models::builtin(Arc::new(InMemoryStore::new()));

        let unknown = seed_fixtures(as_map(json!({ "favorites": [] })), &models).await;
        assert!(matches!(unknown, Err(ApiError::Fixtures(_))));

        let not_array = seed_fixtures(as_map(json!({ "products": {} })), &models).await;
        assert!(matches!(not_array, Err(ApiError::Fixtures(_))));
    }

    #[tokio::test]
    async fn test_invalid_record_loads_nothing_for_that_model() {
        let models = Models::builtin(Arc::new(InMemoryStore::new()));
        let fixtures = as_map(json!({
            "products": [
                { "category": "weapons", "name": "mjolnir" },
                { "name": "no category" },
            ],
        }));

        let err = seed_fixtures(fixtures, &models).await.unwrap_err();
        assert!(matches!(err, ApiError::Collection(CollectionError::InvalidObject(_))));
        assert!(models.get("products").unwrap().get(None).await.unwrap().is_empty());
    }
}
