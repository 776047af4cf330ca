use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Parameters supplied when a video record is created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct VideoParams {
    pub title: String,
    pub description: String,
}

/// Metadata record for an uploaded video.
///
/// Created elsewhere; the upload handlers only ever set `thumbnail_url` or
/// `video_url`, and only when the caller is `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct VideoRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub params: VideoParams,
}

impl VideoRecord {
    pub fn new(user_id: Uuid, params: VideoParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            created_at: now,
            updated_at: now,
            thumbnail_url: None,
            video_url: None,
            params,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Replace one asset URL, leaving the other untouched.
    pub fn set_url(&mut self, field: VideoUrlField, url: impl Into<String>) {
        let url = Some(url.into());
        match field {
            VideoUrlField::Thumbnail => self.thumbnail_url = url,
            VideoUrlField::Video => self.video_url = url,
        }
    }
}

/// The asset URL columns of a video record an upload may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoUrlField {
    Thumbnail,
    Video,
}

impl VideoUrlField {
    pub fn column(&self) -> &'static str {
        match self {
            VideoUrlField::Thumbnail => "thumbnail_url",
            VideoUrlField::Video => "video_url",
        }
    }
}
