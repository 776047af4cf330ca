pub mod metadata;
pub mod upload;

pub use metadata::MetadataUpdater;
pub use upload::{AssetKind, MediaUploadService, StoredAsset};
