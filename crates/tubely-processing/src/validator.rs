use tubely_core::AppError;

/// Extension used when a media type cannot be split into `type/subtype`.
pub const FALLBACK_EXTENSION: &str = ".bin";

const THUMBNAIL_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png"];
const VIDEO_CONTENT_TYPES: &[&str] = &["video/mp4"];

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("File too large: more than {max} bytes")]
    FileTooLarge { max: u64 },

    #[error("Empty file")]
    EmptyFile,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::InvalidContentType { content_type, .. } => {
                AppError::UnsupportedMediaType(format!("Invalid file type: {}", content_type))
            }
            ValidationError::FileTooLarge { max } => {
                AppError::PayloadTooLarge(format!("File too large: more than {} bytes", max))
            }
            ValidationError::EmptyFile => AppError::InvalidInput("Empty file".to_string()),
        }
    }
}

/// Reduce a declared `Content-Type` to its bare, lower-cased media type.
///
/// `image/PNG; charset=binary` becomes `image/png`.
pub fn normalize_mime_type(declared: &str) -> String {
    declared
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// File extension for a media type: `.` followed by the subtype, or
/// [`FALLBACK_EXTENSION`] when the value is not exactly `type/subtype`.
pub fn extension_for(media_type: &str) -> String {
    let parts: Vec<&str> = media_type.split('/').collect();
    if parts.len() != 2 {
        return FALLBACK_EXTENSION.to_string();
    }
    format!(".{}", parts[1])
}

/// Allow-list check for declared upload content types.
#[derive(Debug, Clone)]
pub struct MediaTypeValidator {
    allowed: Vec<String>,
}

impl MediaTypeValidator {
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }

    pub fn thumbnail() -> Self {
        Self::new(THUMBNAIL_CONTENT_TYPES.iter().map(|s| s.to_string()).collect())
    }

    pub fn video() -> Self {
        Self::new(VIDEO_CONTENT_TYPES.iter().map(|s| s.to_string()).collect())
    }

    /// Validate a declared content type and return its normalized form.
    ///
    /// A missing content type is treated as `application/octet-stream`.
    pub fn validate(&self, declared: Option<&str>) -> Result<String, ValidationError> {
        let media_type = normalize_mime_type(declared.unwrap_or("application/octet-stream"));

        if !self.allowed.iter().any(|allowed| allowed == &media_type) {
            return Err(ValidationError::InvalidContentType {
                content_type: media_type,
                allowed: self.allowed.clone(),
            });
        }

        Ok(media_type)
    }
}
