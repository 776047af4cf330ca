use crate::keys::StorageKeyBuilder;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::url::AssetUrlBuilder;
use crate::StorageBackend;
use async_trait::async_trait;
use object_store::aws::AmazonS3Builder;
use object_store::buffered::BufWriter;
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{Attribute, AttributeValue, Attributes, ObjectStore, ObjectStoreExt};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWriteExt};

/// S3 storage implementation
///
/// Objects smaller than the writer's buffer go up in a single put; larger
/// bodies are sent as a multipart upload. Every call is bounded by `timeout`.
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    urls: AssetUrlBuilder,
    timeout: Duration,
}

impl S3Storage {
    /// Create an S3Storage for the bucket, region and optional endpoint in `urls`.
    ///
    /// Credentials come from the standard AWS environment variables.
    pub async fn new(urls: AssetUrlBuilder, timeout: Duration) -> StorageResult<Self> {
        let bucket = urls
            .bucket()
            .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?
            .to_string();
        let region = urls
            .region()
            .ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?
            .to_string();

        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket);

        if let Some(endpoint) = urls.endpoint() {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.to_string())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Self::with_store(Arc::new(store), urls, timeout)
    }

    /// Wrap an existing object store, e.g. `object_store::memory::InMemory` in tests.
    pub fn with_store(
        store: Arc<dyn ObjectStore>,
        urls: AssetUrlBuilder,
        timeout: Duration,
    ) -> StorageResult<Self> {
        let bucket = urls
            .bucket()
            .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?
            .to_string();
        // Fail at startup rather than after the first upload.
        urls.object_url("")?;

        Ok(S3Storage {
            store,
            bucket,
            urls,
            timeout,
        })
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload_stream(
        &self,
        storage_key: &str,
        content_type: &str,
        content_length: Option<u64>,
        mut reader: Pin<Box<dyn AsyncRead + Send + Unpin>>,
    ) -> StorageResult<String> {
        StorageKeyBuilder::validate(storage_key)?;
        let start = std::time::Instant::now();
        let location = Path::from(storage_key);

        let mut attributes = Attributes::new();
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );
        let mut writer =
            BufWriter::new(Arc::clone(&self.store), location).with_attributes(attributes);

        let upload = async {
            let bytes = tokio::io::copy(&mut reader, &mut writer).await?;
            writer.shutdown().await?;
            Ok::<u64, std::io::Error>(bytes)
        };
        let result = tokio::time::timeout(self.timeout, upload).await;

        let size = match result {
            Ok(Ok(size)) => size,
            Ok(Err(e)) => {
                if let Err(abort) = writer.abort().await {
                    tracing::warn!(error = %abort, key = %storage_key, "S3 upload abort failed");
                }
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    size_bytes = content_length,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 stream upload failed"
                );
                return Err(StorageError::UploadFailed(e.to_string()));
            }
            Err(_) => {
                if let Err(abort) = writer.abort().await {
                    tracing::warn!(error = %abort, key = %storage_key, "S3 upload abort failed");
                }
                tracing::error!(
                    bucket = %self.bucket,
                    key = %storage_key,
                    timeout_secs = self.timeout.as_secs(),
                    "S3 stream upload timed out"
                );
                return Err(StorageError::Timeout(self.timeout));
            }
        };

        let url = self.urls.object_url(storage_key)?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 stream upload successful"
        );

        Ok(url)
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        StorageKeyBuilder::validate(storage_key)?;
        let start = std::time::Instant::now();
        let location = Path::from(storage_key);

        let result = tokio::time::timeout(self.timeout, self.store.delete(&location))
            .await
            .map_err(|_| StorageError::Timeout(self.timeout))?;

        match result {
            Ok(()) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 delete successful"
        );

        Ok(())
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
