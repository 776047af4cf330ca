//! Storage setup

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_storage::{create_asset_storage, create_storage, Storage};

/// Returns `(video_storage, asset_storage)`.
pub async fn setup_storage(config: &Config) -> Result<(Arc<dyn Storage>, Arc<dyn Storage>)> {
    let video_storage = create_storage(config)
        .await
        .context("Failed to initialize video storage")?;
    let asset_storage = create_asset_storage(config)
        .await
        .context("Failed to initialize assets directory")?;

    tracing::info!(
        video_backend = %video_storage.backend_type(),
        assets_root = %config.assets_root().display(),
        "Storage initialized"
    );

    Ok((video_storage, asset_storage))
}
