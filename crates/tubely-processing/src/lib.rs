//! Tubely Processing Library
//!
//! Everything that happens to an upload between the HTTP layer and storage:
//! asset identifiers, media type validation, request-scoped buffering and
//! video geometry classification.

pub mod identifier;
pub mod upload;
pub mod validator;
pub mod video;

pub use identifier::{AssetIdGenerator, IdentifierError, OsRandomIds, ASSET_ID_BYTES};
pub use upload::{BufferError, BufferedUpload, UploadBuffer};
pub use validator::{extension_for, normalize_mime_type, MediaTypeValidator, ValidationError};
pub use video::{
    classify, AspectClassification, AspectError, AspectRatioClassifier, FfprobeProber,
    MediaProber, ProbeError, StreamGeometry, ASPECT_TOLERANCE,
};
