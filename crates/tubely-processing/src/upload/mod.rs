//! Request-scoped upload buffering.

pub mod buffer;

pub use buffer::{BufferError, BufferedUpload, UploadBuffer};
