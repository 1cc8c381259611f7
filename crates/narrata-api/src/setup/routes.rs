//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::constants::{DOCS_PATH, IMAGE_TO_SPEECH_PATH, LIVENESS_PATH, OPENAPI_PATH};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use narrata_core::ServerConfig;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

/// Setup all application routes
pub fn setup_routes(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    tracing::info!(
        http_concurrency_limit = config.concurrency_limit,
        max_upload_bytes = config.max_upload_bytes,
        "HTTP limits configured"
    );

    let app = Router::new()
        .route(IMAGE_TO_SPEECH_PATH, post(handlers::image_to_speech::image_to_speech))
        .route(LIVENESS_PATH, get(handlers::health::liveness_check))
        .route(OPENAPI_PATH, get(|| async { Json(ApiDoc::openapi()) }))
        .merge(RapiDoc::new(OPENAPI_PATH).path(DOCS_PATH))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(ConcurrencyLimitLayer::new(config.concurrency_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &ServerConfig) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        if config.is_production() {
            tracing::warn!("CORS configured to allow all origins - not recommended for production");
        }
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
