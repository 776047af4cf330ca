use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tubely_core::{AppError, VideoRecord, VideoUrlField};
use uuid::Uuid;

use super::video::VideoRepository;

/// Process-local video store, used when no `DATABASE_URL` is configured and in tests.
#[derive(Default)]
pub struct InMemoryVideoRepository {
    videos: RwLock<HashMap<Uuid, VideoRecord>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoRepository for InMemoryVideoRepository {
    async fn create_video(&self, video: &VideoRecord) -> Result<VideoRecord, AppError> {
        let mut videos = self.videos.write().await;
        if videos.contains_key(&video.id) {
            return Err(AppError::InvalidInput(format!(
                "Video {} already exists",
                video.id
            )));
        }
        videos.insert(video.id, video.clone());
        Ok(video.clone())
    }

    async fn get_video(&self, id: Uuid) -> Result<VideoRecord, AppError> {
        self.videos
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))
    }

    async fn set_url(
        &self,
        id: Uuid,
        owner: Uuid,
        field: VideoUrlField,
        url: &str,
    ) -> Result<VideoRecord, AppError> {
        let mut videos = self.videos.write().await;
        let stored = videos
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;
        if !stored.is_owned_by(owner) {
            return Err(AppError::NotOwner {
                user_id: owner,
                video_id: id,
            });
        }

        stored.set_url(field, url);
        stored.updated_at = Utc::now();

        tracing::debug!(video_id = %id, column = field.column(), "Video record updated");
        Ok(stored.clone())
    }
}
