use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tubely_core::{AppError, VideoRecord, VideoUrlField};
use uuid::Uuid;

const VIDEO_COLUMNS: &str =
    "id, user_id, created_at, updated_at, thumbnail_url, video_url, title, description";

/// Metadata store for video records.
///
/// `set_url` must be a single atomic write of one column; callers do no
/// locking of their own, and concurrent setters of different fields must
/// not overwrite each other.
#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn create_video(&self, video: &VideoRecord) -> Result<VideoRecord, AppError>;

    /// Fetch a record; `AppError::NotFound` when it does not exist.
    async fn get_video(&self, id: Uuid) -> Result<VideoRecord, AppError>;

    /// Set one asset URL on a record owned by `owner` and return the stored
    /// record with a refreshed `updated_at`.
    ///
    /// `AppError::NotFound` when the record does not exist,
    /// `AppError::NotOwner` when it belongs to someone else.
    async fn set_url(
        &self,
        id: Uuid,
        owner: Uuid,
        field: VideoUrlField,
        url: &str,
    ) -> Result<VideoRecord, AppError>;
}

/// Repository for video records in Postgres
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "insert", db.record_id = %video.id))]
    async fn create_video(&self, video: &VideoRecord) -> Result<VideoRecord, AppError> {
        let query = format!(
            r#"
            INSERT INTO videos (id, user_id, created_at, updated_at, thumbnail_url, video_url, title, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            VIDEO_COLUMNS
        );
        let created = sqlx::query_as::<Postgres, VideoRecord>(&query)
            .bind(video.id)
            .bind(video.user_id)
            .bind(video.created_at)
            .bind(video.updated_at)
            .bind(&video.thumbnail_url)
            .bind(&video.video_url)
            .bind(&video.params.title)
            .bind(&video.params.description)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn get_video(&self, id: Uuid) -> Result<VideoRecord, AppError> {
        let query = format!("SELECT {} FROM videos WHERE id = $1", VIDEO_COLUMNS);
        sqlx::query_as::<Postgres, VideoRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))
    }

    #[tracing::instrument(skip(self, url), fields(db.table = "videos", db.operation = "update", db.record_id = %id, db.column = field.column()))]
    async fn set_url(
        &self,
        id: Uuid,
        owner: Uuid,
        field: VideoUrlField,
        url: &str,
    ) -> Result<VideoRecord, AppError> {
        let query = format!(
            r#"
            UPDATE videos
            SET {} = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            field.column(),
            VIDEO_COLUMNS
        );
        let updated = sqlx::query_as::<Postgres, VideoRecord>(&query)
            .bind(id)
            .bind(owner)
            .bind(url)
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(video) => Ok(video),
            // No row matched: tell a missing record apart from someone else's.
            None => {
                self.get_video(id).await?;
                Err(AppError::NotOwner {
                    user_id: owner,
                    video_id: id,
                })
            }
        }
    }
}
