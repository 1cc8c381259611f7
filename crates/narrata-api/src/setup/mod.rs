//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod services;

use crate::state::AppState;
use anyhow::{Context, Result};
use narrata_core::Config;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.server.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.server.environment,
        storage_backend = %config.storage.backend,
        "Configuration loaded and validated successfully"
    );

    let pipeline = services::initialize_pipeline(&config)?;
    let state = AppState::new(pipeline, config.server.max_upload_bytes);

    let router = routes::setup_routes(&config.server, state.clone())?;

    Ok((state, router))
}
