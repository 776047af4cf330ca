//! Tubely Storage Library
//!
//! The [`Storage`] trait and its local filesystem and S3 implementations.
//!
//! # Storage key format
//!
//! - **Video bodies**: `{orientation}/{asset_id}{extension}`
//! - **Thumbnails**: `{asset_id}{extension}`, flat under the assets root
//!
//! Keys must not contain `..` or a leading `/`. Key generation lives in the
//! `keys` module and URL generation in the `url` module so all backends agree.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;
pub mod url;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use factory::create_asset_storage;
pub use keys::StorageKeyBuilder;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
pub use url::AssetUrlBuilder;
