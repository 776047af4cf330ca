use std::path::Path;
use std::sync::Arc;
use tubely_core::{AppError, AspectRatio, Orientation};

use super::probe::{MediaProber, StreamGeometry};

/// Maximum absolute distance between a measured ratio and 16/9 or 9/16.
pub const ASPECT_TOLERANCE: f64 = 0.1;

const LANDSCAPE_RATIO: f64 = 16.0 / 9.0;
const PORTRAIT_RATIO: f64 = 9.0 / 16.0;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AspectError {
    #[error("Video height is zero")]
    ZeroHeight,
}

impl From<AspectError> for AppError {
    fn from(err: AspectError) -> Self {
        AppError::MediaProbe(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectClassification {
    pub ratio: f64,
    pub aspect_ratio: AspectRatio,
}

impl AspectClassification {
    pub fn orientation(&self) -> Orientation {
        self.aspect_ratio.orientation()
    }
}

/// Bucket raw stream geometry. 16:9 is checked before 9:16.
pub fn classify(width: u32, height: u32) -> Result<AspectClassification, AspectError> {
    if height == 0 {
        return Err(AspectError::ZeroHeight);
    }

    let ratio = f64::from(width) / f64::from(height);
    let aspect_ratio = if (ratio - LANDSCAPE_RATIO).abs() <= ASPECT_TOLERANCE {
        AspectRatio::Landscape16x9
    } else if (ratio - PORTRAIT_RATIO).abs() <= ASPECT_TOLERANCE {
        AspectRatio::Portrait9x16
    } else {
        AspectRatio::Other
    };

    Ok(AspectClassification {
        ratio,
        aspect_ratio,
    })
}

/// Probes a buffered video and classifies its first stream.
#[derive(Clone)]
pub struct AspectRatioClassifier {
    prober: Arc<dyn MediaProber>,
}

impl AspectRatioClassifier {
    pub fn new(prober: Arc<dyn MediaProber>) -> Self {
        Self { prober }
    }

    pub async fn classify_file(&self, path: &Path) -> Result<AspectClassification, AppError> {
        let StreamGeometry { width, height } = self.prober.probe(path).await?;
        let classification = classify(width, height)?;

        tracing::debug!(
            width,
            height,
            ratio = classification.ratio,
            aspect_ratio = %classification.aspect_ratio,
            "Classified video aspect ratio"
        );

        Ok(classification)
    }
}
