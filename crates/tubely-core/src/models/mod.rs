pub mod asset;
pub mod video;

pub use asset::{AspectRatio, AssetId, Orientation};
pub use video::{VideoParams, VideoRecord, VideoUrlField};
