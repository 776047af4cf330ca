//! Tubely Core Library
//!
//! Domain models, error types and configuration shared by every Tubely crate.

pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, IngestConfig, LogFormat, StorageConfig, TubelyConfig};
pub use error::{AppError, ErrorCategory, ErrorMetadata, LogLevel};
pub use models::{AspectRatio, AssetId, Orientation, VideoParams, VideoRecord, VideoUrlField};
pub use storage_types::StorageBackend;
