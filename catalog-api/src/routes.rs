//! Route handlers for the `/api/v1/{model}` resource family.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    routing::get,
};
use serde_json::Value;

use catalog::{
    collection::DynCollection,
    filter::Filter,
    listing::Listing,
    record::{Record, RecordExt},
};

use crate::{
    error::{ApiError, ApiResult},
    models::Models,
};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub models: Arc<Models>,
}

impl AppState {
    pub fn new(models: Models) -> Self {
        Self {
            models: Arc::new(models),
        }
    }

    /// Resolves the `{model}` path segment to its collection.
    fn collection(&self, model: &str) -> ApiResult<&DynCollection> {
        self.models
            .get(model)
            .ok_or_else(|| ApiError::UnknownModel(model.to_string()))
    }
}

/// Routes for the model resources, relative to `/api/v1`.
pub fn model_routes(state: AppState) -> Router {
    Router::new()
        .route("/:model", get(list_records).post(create_record))
        .route(
            "/:model/:id",
            get(get_record).put(update_record).delete(delete_record),
        )
        .with_state(state)
}

pub async fn root() -> &'static str {
    "API is up! Hooray!"
}

pub async fn not_supported() -> ApiError {
    ApiError::RouteNotSupported
}

fn record_body(body: Result<Json<Value>, JsonRejection>) -> ApiResult<Record> {
    let Json(value) = body.map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;
    Ok(Record::from_json(value)?)
}

async fn list_records(
    State(state): State<AppState>,
    Path(model): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Listing<Value>>> {
    let filter = params.into_iter().collect::<Filter>();
    let records = state.collection(&model)?.find(&filter).await?;

    Ok(Json(Listing::from(records).map(|record| record.to_json())))
}

async fn get_record(
    State(state): State<AppState>,
    Path((model, id)): Path<(String, String)>,
) -> ApiResult<Json<Vec<Value>>> {
    let records = state.collection(&model)?.get(Some(&id)).await?;

    Ok(Json(records.iter().map(RecordExt::to_json).collect()))
}

async fn create_record(
    State(state): State<AppState>,
    Path(model): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let collection = state.collection(&model)?;
    let created = collection.create(record_body(body)?).await?;

    tracing::debug!(model = %model, id = ?created.record_id(), "created record");
    Ok(Json(created.to_json()))
}

async fn update_record(
    State(state): State<AppState>,
    Path((model, id)): Path<(String, String)>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let collection = state.collection(&model)?;
    let updated = collection.update(&id, record_body(body)?).await?;

    Ok(Json(updated.to_json()))
}

async fn delete_record(
    State(state): State<AppState>,
    Path((model, id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let deleted = state.collection(&model)?.delete(&id).await?;

    Ok(Json(deleted.to_json()))
}
