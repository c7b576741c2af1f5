//! Error types for view decoding and volume output.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while decoding view images or writing volumes.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Unknown view label: {0}")]
    UnknownView(String),

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),

    #[error("Image {} has no alpha channel", .path.display())]
    MissingAlpha { path: PathBuf },

    #[error("Invalid image buffer: {0}")]
    InvalidBuffer(String),

    #[error("Image decoding error: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
