//! Common utilities for file upload handlers

use axum::extract::multipart::Field;
use tubely_core::AppError;
use tubely_processing::{BufferedUpload, UploadBuffer, ValidationError};
use uuid::Uuid;

use crate::error::multipart_error;

/// Parse the `{videoID}` path segment.
pub fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::InvalidInput("Invalid ID".to_string()))
}

pub fn missing_field(name: &str) -> AppError {
    AppError::InvalidInput(format!("Missing form field '{}'", name))
}

/// Read a form part into memory, failing once it passes `max_bytes`.
pub async fn read_field_to_memory(
    field: &mut Field<'_>,
    max_bytes: usize,
) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if data.len() + chunk.len() > max_bytes {
            return Err(ValidationError::FileTooLarge {
                max: max_bytes as u64,
            }
            .into());
        }
        data.extend_from_slice(&chunk);
    }

    if data.is_empty() {
        return Err(ValidationError::EmptyFile.into());
    }

    Ok(data)
}

/// Drain a form part into a request-scoped temp file.
///
/// On error the buffer is dropped here, which removes the file.
pub async fn buffer_field_to_file(
    field: &mut Field<'_>,
    mut buffer: UploadBuffer,
) -> Result<BufferedUpload, AppError> {
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        buffer.write_chunk(&chunk).await?;
    }

    Ok(buffer.finish().await?)
}
