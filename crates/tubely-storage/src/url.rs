//! Public URL construction for stored assets.

use tubely_core::Config;

use crate::{StorageError, StorageResult};

/// Builds retrieval URLs from configuration alone.
///
/// - local assets: `{public_base_url}/assets/{key}`
/// - S3 objects: `https://{bucket}.s3.{region}.amazonaws.com/{key}`, or
///   `{endpoint}/{bucket}/{key}` for S3-compatible providers
#[derive(Debug, Clone)]
pub struct AssetUrlBuilder {
    public_base_url: String,
    bucket: Option<String>,
    region: Option<String>,
    endpoint: Option<String>,
}

impl AssetUrlBuilder {
    pub fn new(
        public_base_url: impl Into<String>,
        bucket: Option<String>,
        region: Option<String>,
        endpoint: Option<String>,
    ) -> Self {
        Self {
            public_base_url: public_base_url.into(),
            bucket,
            region,
            endpoint,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.public_base_url(),
            config.s3_bucket().map(String::from),
            config.s3_region().map(String::from),
            config.s3_endpoint().map(String::from),
        )
    }

    pub fn local_asset_url(&self, key: &str) -> String {
        format!("{}/assets/{}", self.public_base_url.trim_end_matches('/'), key)
    }

    pub fn object_url(&self, key: &str) -> StorageResult<String> {
        let bucket = self
            .bucket
            .as_deref()
            .ok_or_else(|| StorageError::ConfigError("S3 bucket not configured".to_string()))?;

        if let Some(endpoint) = &self.endpoint {
            return Ok(format!(
                "{}/{}/{}",
                endpoint.trim_end_matches('/'),
                bucket,
                key
            ));
        }

        let region = self
            .region
            .as_deref()
            .ok_or_else(|| StorageError::ConfigError("S3 region not configured".to_string()))?;
        Ok(format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key))
    }

    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}
