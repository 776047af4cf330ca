//! Buffers an incoming upload body into a temporary file owned by one request.
//!
//! The file lives behind a [`TempPath`], so it is unlinked when the buffer is
//! dropped: on success, on any error return, and when the request future is
//! cancelled.

use std::io::SeekFrom;
use std::path::Path;
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};
use tubely_core::AppError;

use crate::validator::ValidationError;

const TEMP_FILE_PREFIX: &str = "tubely-upload";

#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Temp file error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<BufferError> for AppError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::Validation(e) => e.into(),
            BufferError::Io(e) => AppError::Internal(format!("Couldn't buffer upload: {}", e)),
        }
    }
}

/// A temp file being filled chunk by chunk.
#[derive(Debug)]
pub struct UploadBuffer {
    file: File,
    path: TempPath,
    written: u64,
    max_bytes: u64,
}

impl UploadBuffer {
    /// Create an empty temp file in `temp_dir` (or the OS temp dir).
    pub fn create(
        temp_dir: Option<&Path>,
        suffix: &str,
        max_bytes: u64,
    ) -> Result<Self, BufferError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(TEMP_FILE_PREFIX).suffix(suffix);
        let named = match temp_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        let (file, path) = named.into_parts();

        Ok(Self {
            file: File::from_std(file),
            path,
            written: 0,
            max_bytes,
        })
    }

    /// Append a chunk, failing once the total passes `max_bytes`.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), BufferError> {
        let total = self.written + chunk.len() as u64;
        if total > self.max_bytes {
            return Err(ValidationError::FileTooLarge {
                max: self.max_bytes,
            }
            .into());
        }
        self.file.write_all(chunk).await?;
        self.written = total;
        Ok(())
    }

    /// Flush and rewind so readers start at the first byte.
    pub async fn finish(mut self) -> Result<BufferedUpload, BufferError> {
        if self.written == 0 {
            return Err(ValidationError::EmptyFile.into());
        }
        self.file.flush().await?;
        self.file.sync_data().await?;
        self.file.seek(SeekFrom::Start(0)).await?;

        Ok(BufferedUpload {
            file: self.file,
            path: self.path,
            size: self.written,
        })
    }
}

/// A fully buffered, rewound upload.
#[derive(Debug)]
pub struct BufferedUpload {
    file: File,
    path: TempPath,
    size: u64,
}

impl BufferedUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Handle positioned at the start of the file.
    ///
    /// The returned handle shares the cursor with this buffer; the temp file
    /// itself stays on disk until the `BufferedUpload` is dropped.
    pub async fn reader(&mut self) -> Result<File, BufferError> {
        self.file.seek(SeekFrom::Start(0)).await?;
        Ok(self.file.try_clone().await?)
    }
}
