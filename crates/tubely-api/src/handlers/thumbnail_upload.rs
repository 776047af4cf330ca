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

/// `POST /api/thumbnail_upload/{videoID}`
///
/// Multipart field `thumbnail`, `image/jpeg` or `image/png`. Responds with
/// the updated record.
#[tracing::instrument(skip_all, fields(video_id = %raw_video_id, user_id = %user.user_id))]
pub async fn upload_thumbnail(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(raw_video_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<VideoRecord>, HttpAppError> {
    let video_id = parse_video_id(&raw_video_id)?;

    let metadata = MetadataUpdater::new(state.videos.clone());
    metadata.authorize(video_id, user.user_id).await?;

    let uploads = MediaUploadService::new(&state);
    let asset = uploads.upload_thumbnail(&mut multipart).await?;

    match metadata
        .set_thumbnail_url(video_id, user.user_id, &asset.url)
        .await
    {
        Ok(video) => Ok(Json(video)),
        Err(e) => {
            uploads.discard(&asset).await;
            Err(e.into())
        }
    }
}
