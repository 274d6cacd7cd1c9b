//! Router assembly and the server lifecycle.

use std::sync::Arc;

use axum::{
    Router,
    http::HeaderValue,
    middleware::from_fn,
    routing::get,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use catalog::{
    backend::{RecordBackend, RecordBackendBuilder, SharedBackend},
    memory::InMemoryStore,
};

use crate::{
    config::{BackendKind, Config},
    error::{ApiError, ApiResult},
    fixtures::load_fixtures,
    middleware::{logger, mock_auth, timestamp},
    models::Models,
    routes::{AppState, model_routes, not_supported, root},
};

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Builds the full application router.
///
/// Middleware runs outermost first: CORS, request tracing, timestamp,
/// logger, then the auth gate.
pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(root))
        .nest("/api/v1", model_routes(state))
        .fallback(not_supported)
        .layer(from_fn(mock_auth))
        .layer(from_fn(logger))
        .layer(from_fn(timestamp))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

/// Creates the backend selected by the configuration.
pub async fn build_backend(config: &Config) -> ApiResult<SharedBackend> {
    match config.backend {
        BackendKind::Memory => {
            let backend: SharedBackend = Arc::new(InMemoryStore::builder().build().await?);
            Ok(backend)
        }
        BackendKind::Mongodb => mongodb_backend(config).await,
    }
}

#[cfg(feature = "mongodb")]
async fn mongodb_backend(config: &Config) -> ApiResult<SharedBackend> {
    use catalog::mongodb::MongoDbStore;

    let uri = config
        .mongodb_uri
        .as_deref()
        .ok_or_else(|| ApiError::Config("--mongodb-uri is required with the mongodb backend".into()))?;

    let backend: SharedBackend = Arc::new(
        MongoDbStore::builder(uri, &config.mongodb_database)
            .build()
            .await?,
    );

    Ok(backend)
}

#[cfg(not(feature = "mongodb"))]
async fn mongodb_backend(_config: &Config) -> ApiResult<SharedBackend> {
    Err(ApiError::Config(
        "the mongodb backend requires building with the `mongodb` feature".into(),
    ))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}

/// Runs the server until ctrl-c, then shuts the backend down.
pub async fn serve(config: Config) -> ApiResult<()> {
    let backend = build_backend(&config).await?;
    let models = Models::builtin(backend.clone());

    if let Some(path) = &config.fixtures {
        let count = load_fixtures(path, &models).await?;
        tracing::info!(path = %path.display(), count, "loaded fixtures");
    }

    let app = router(AppState::new(models), &config.cors_origins);
    let listener = TcpListener::bind(config.socket_addr()).await?;
    tracing::info!(addr = %listener.local_addr()?, backend = ?config.backend, "catalog api listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    backend.shutdown().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_backend_builds() {
        let backend = build_backend(&Config::default()).await.unwrap();
        assert!(backend.list_collections().await.unwrap().is_empty());
    }

    #[cfg(not(feature = "mongodb"))]
    #[tokio::test]
    async fn test_mongodb_needs_feature() {
        let config = Config {
            backend: BackendKind::Mongodb,
            ..Config::default()
        };
        assert!(matches!(build_backend(&config).await, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_router_builds_with_origins() {
        let models = Models::builtin(Arc::new(InMemoryStore::new()));
        let _router = router(AppState::new(models), &["http://localhost:5173".to_string()]);
    }
}
