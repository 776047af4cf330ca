//! Ownership-checked updates of a video's asset URLs.

use std::sync::Arc;
use tubely_core::{AppError, VideoRecord, VideoUrlField};
use tubely_db::VideoRepository;
use uuid::Uuid;

#[derive(Clone)]
pub struct MetadataUpdater {
    videos: Arc<dyn VideoRepository>,
}

impl MetadataUpdater {
    pub fn new(videos: Arc<dyn VideoRepository>) -> Self {
        Self { videos }
    }

    /// Fetch the record and require `user_id` to own it.
    ///
    /// The setters re-check ownership in the same write, so a record read
    /// here is never written back.
    pub async fn authorize(&self, video_id: Uuid, user_id: Uuid) -> Result<VideoRecord, AppError> {
        let video = self.videos.get_video(video_id).await?;
        if !video.is_owned_by(user_id) {
            return Err(AppError::NotOwner { user_id, video_id });
        }
        Ok(video)
    }

    pub async fn set_thumbnail_url(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        url: &str,
    ) -> Result<VideoRecord, AppError> {
        let updated = self
            .videos
            .set_url(video_id, user_id, VideoUrlField::Thumbnail, url)
            .await?;
        tracing::info!(video_id = %video_id, thumbnail_url = %url, "Thumbnail URL updated");
        Ok(updated)
    }

    pub async fn set_video_url(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        url: &str,
    ) -> Result<VideoRecord, AppError> {
        let updated = self
            .videos
            .set_url(video_id, user_id, VideoUrlField::Video, url)
            .await?;
        tracing::info!(video_id = %video_id, video_url = %url, "Video URL updated");
        Ok(updated)
    }
}
