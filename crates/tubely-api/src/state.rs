use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::{AspectRatioClassifier, AssetIdGenerator};
use tubely_storage::Storage;

/// Everything a request handler needs. Built once at startup and shared
/// behind an `Arc`; holds no per-request mutable state.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoRepository>,
    /// Receives video bodies (S3, or local disk in development).
    pub video_storage: Arc<dyn Storage>,
    /// Local assets root that receives thumbnails.
    pub asset_storage: Arc<dyn Storage>,
    pub ids: Arc<dyn AssetIdGenerator>,
    pub classifier: AspectRatioClassifier,
}
