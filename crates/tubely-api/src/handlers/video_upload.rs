use crate::auth::AuthUser;
use crate::error::HttpAppError;
use crate::services::{MediaUploadService, MetadataUpdater};
use crate::state::AppState;
use crate::utils::upload::parse_video_id;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::VideoRecord;

/// `POST /api/video_upload/{videoID}`
///
/// Multipart field `video`, `video/mp4`. The body is buffered to a temp file,
/// probed for its aspect ratio and stored under `{orientation}/{id}.mp4`.
/// If the record update fails the stored object is deleted again.
#[tracing::instrument(skip_all, fields(video_id = %raw_video_id, user_id = %user.user_id))]
pub async fn upload_video(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(raw_video_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<VideoRecord>, HttpAppError> {
    let video_id = parse_video_id(&raw_video_id)?;

    let metadata = MetadataUpdater::new(state.videos.clone());
    metadata.authorize(video_id, user.user_id).await?;

    let uploads = MediaUploadService::new(&state);
    let asset = uploads.upload_video(&mut multipart).await?;

    match metadata
        .set_video_url(video_id, user.user_id, &asset.url)
        .await
    {
        Ok(video) => {
            tracing::info!(key = %asset.key, size_bytes = asset.size_bytes, "Video upload complete");
            Ok(Json(video))
        }
        Err(e) => {
            uploads.discard(&asset).await;
            Err(e.into())
        }
    }
}
