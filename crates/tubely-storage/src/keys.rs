//! Shared key generation for storage backends.

use tubely_core::{AssetId, Orientation};

use crate::{StorageError, StorageResult};

pub struct StorageKeyBuilder;

impl StorageKeyBuilder {
    /// Object key for a video body: `{orientation}/{asset_id}{extension}`.
    pub fn video_key(orientation: Orientation, asset_id: &AssetId, extension: &str) -> String {
        format!("{}/{}{}", orientation, asset_id, extension)
    }

    /// File name for a thumbnail under the assets root: `{asset_id}{extension}`.
    pub fn thumbnail_filename(asset_id: &AssetId, extension: &str) -> String {
        format!("{}{}", asset_id, extension)
    }

    /// Reject keys that could escape the storage root.
    pub fn validate(storage_key: &str) -> StorageResult<()> {
        if storage_key.is_empty() || storage_key.contains("..") || storage_key.starts_with('/') {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }
        Ok(())
    }
}
