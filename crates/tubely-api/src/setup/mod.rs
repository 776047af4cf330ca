//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_processing::{AspectRatioClassifier, FfprobeProber, OsRandomIds};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(&config).context("Failed to initialize telemetry")?;

    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        "Configuration loaded and validated successfully"
    );

    let videos = database::setup_repository(&config).await?;
    let (video_storage, asset_storage) = storage::setup_storage(&config).await?;

    let prober = FfprobeProber::new(config.ffprobe_path(), config.probe_timeout());

    let state = Arc::new(AppState {
        config: config.clone(),
        videos,
        video_storage,
        asset_storage,
        ids: Arc::new(OsRandomIds),
        classifier: AspectRatioClassifier::new(Arc::new(prober)),
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
