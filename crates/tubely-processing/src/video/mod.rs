//! Video geometry probing and aspect classification.

pub mod aspect;
pub mod probe;

pub use aspect::{classify, AspectClassification, AspectError, AspectRatioClassifier, ASPECT_TOLERANCE};
pub use probe::{FfprobeProber, MediaProber, ProbeError, StreamGeometry};
