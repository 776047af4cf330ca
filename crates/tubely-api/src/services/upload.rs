//! Media upload pipelines
//!
//! Thumbnail: extract → validate → read (in memory) → name → write to the
//! local assets root.
//!
//! Video: extract → validate → buffer to a temp file → probe and classify →
//! key by orientation → put to the video store. The temp file is removed when
//! the buffered upload goes out of scope, whichever way the pipeline exits.
//!
//! Neither pipeline touches the metadata store; handlers persist the
//! returned URL and call [`MediaUploadService::discard`] if that fails.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::Multipart;
use tubely_core::AppError;
use tubely_processing::{extension_for, MediaTypeValidator, UploadBuffer};
use tubely_storage::{Storage, StorageKeyBuilder};

use crate::error::multipart_error;
use crate::state::AppState;
use crate::utils::upload::{buffer_field_to_file, missing_field, read_field_to_memory};

pub const THUMBNAIL_FIELD: &str = "thumbnail";
pub const VIDEO_FIELD: &str = "video";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Thumbnail,
    Video,
}

/// An asset that is in storage but not yet referenced by any record.
#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub kind: AssetKind,
    pub key: String,
    pub url: String,
    pub size_bytes: u64,
}

pub struct MediaUploadService {
    state: Arc<AppState>,
}

impl MediaUploadService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Store the `thumbnail` form part under the local assets root.
    pub async fn upload_thumbnail(&self, multipart: &mut Multipart) -> Result<StoredAsset, AppError> {
        let mut field = loop {
            let field = multipart
                .next_field()
                .await
                .map_err(multipart_error)?
                .ok_or_else(|| missing_field(THUMBNAIL_FIELD))?;
            if field.name() == Some(THUMBNAIL_FIELD) {
                break field;
            }
        };

        let media_type = MediaTypeValidator::thumbnail().validate(field.content_type())?;
        let data =
            read_field_to_memory(&mut field, self.state.config.max_thumbnail_size_bytes()).await?;
        let size_bytes = data.len() as u64;

        let asset_id = self.state.ids.generate()?;
        let key = StorageKeyBuilder::thumbnail_filename(&asset_id, &extension_for(&media_type));

        let url = self
            .state
            .asset_storage
            .upload_stream(&key, &media_type, Some(size_bytes), Box::pin(Cursor::new(data)))
            .await?;

        tracing::info!(
            key = %key,
            content_type = %media_type,
            size_bytes,
            "Thumbnail stored"
        );

        Ok(StoredAsset {
            kind: AssetKind::Thumbnail,
            key,
            url,
            size_bytes,
        })
    }

    /// Buffer, classify and store the `video` form part.
    pub async fn upload_video(&self, multipart: &mut Multipart) -> Result<StoredAsset, AppError> {
        let mut field = loop {
            let field = multipart
                .next_field()
                .await
                .map_err(multipart_error)?
                .ok_or_else(|| missing_field(VIDEO_FIELD))?;
            if field.name() == Some(VIDEO_FIELD) {
                break field;
            }
        };

        let media_type = MediaTypeValidator::video().validate(field.content_type())?;
        let extension = extension_for(&media_type);

        let temp_dir = self.state.config.upload_temp_dir().map(PathBuf::as_path);
        let buffer = UploadBuffer::create(
            temp_dir,
            &extension,
            self.state.config.max_video_size_bytes() as u64,
        )?;
        let mut upload = buffer_field_to_file(&mut field, buffer).await?;
        let size_bytes = upload.size();
        tracing::debug!(size_bytes, "Video body buffered");

        let classification = self.state.classifier.classify_file(upload.path()).await?;

        let asset_id = self.state.ids.generate()?;
        let key = StorageKeyBuilder::video_key(classification.orientation(), &asset_id, &extension);

        let reader = upload.reader().await?;
        let url = self
            .state
            .video_storage
            .upload_stream(&key, &media_type, Some(size_bytes), Box::pin(reader))
            .await?;

        tracing::info!(
            key = %key,
            aspect_ratio = %classification.aspect_ratio,
            size_bytes,
            backend = %self.state.video_storage.backend_type(),
            "Video stored"
        );

        Ok(StoredAsset {
            kind: AssetKind::Video,
            key,
            url,
            size_bytes,
        })
    }

    /// Remove an asset whose record update failed. Never fails; a key that
    /// cannot be removed is logged so it can be swept by hand.
    pub async fn discard(&self, asset: &StoredAsset) {
        match self.storage_for(asset.kind).delete(&asset.key).await {
            Ok(()) => {
                tracing::warn!(key = %asset.key, kind = ?asset.kind, "Discarded unreferenced asset");
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    key = %asset.key,
                    kind = ?asset.kind,
                    "Failed to discard unreferenced asset; object is orphaned"
                );
            }
        }
    }

    fn storage_for(&self, kind: AssetKind) -> &Arc<dyn Storage> {
        match kind {
            AssetKind::Thumbnail => &self.state.asset_storage,
            AssetKind::Video => &self.state.video_storage,
        }
    }
}
