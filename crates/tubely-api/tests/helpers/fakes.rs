use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tubely_core::{AppError, AssetId, VideoRecord, VideoUrlField};
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_processing::{AssetIdGenerator, IdentifierError, MediaProber, ProbeError, StreamGeometry};
use uuid::Uuid;

/// Reports a fixed geometry and remembers which files it was asked about.
pub struct RecordingProber {
    geometry: StreamGeometry,
    probed: Mutex<Vec<(PathBuf, bool)>>,
}

impl RecordingProber {
    pub fn new(geometry: StreamGeometry) -> Self {
        Self {
            geometry,
            probed: Mutex::new(Vec::new()),
        }
    }

    /// `(path, existed_at_probe_time)` for every call.
    pub fn probed(&self) -> Vec<(PathBuf, bool)> {
        self.probed.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaProber for RecordingProber {
    async fn probe(&self, path: &Path) -> Result<StreamGeometry, ProbeError> {
        self.probed
            .lock()
            .unwrap()
            .push((path.to_path_buf(), path.is_file()));
        Ok(self.geometry)
    }
}

/// Always hands out the same identifier.
pub struct FixedIds(pub &'static str);

impl AssetIdGenerator for FixedIds {
    fn generate(&self) -> Result<AssetId, IdentifierError> {
        Ok(AssetId::new(self.0))
    }
}

/// Reads succeed, every update fails as if the database went away.
pub struct FailingUpdates {
    inner: Arc<InMemoryVideoRepository>,
}

impl FailingUpdates {
    pub fn new(inner: Arc<InMemoryVideoRepository>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl VideoRepository for FailingUpdates {
    async fn create_video(&self, video: &VideoRecord) -> Result<VideoRecord, AppError> {
        self.inner.create_video(video).await
    }

    async fn get_video(&self, id: Uuid) -> Result<VideoRecord, AppError> {
        self.inner.get_video(id).await
    }

    async fn set_url(
        &self,
        _id: Uuid,
        _owner: Uuid,
        _field: VideoUrlField,
        _url: &str,
    ) -> Result<VideoRecord, AppError> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }
}
