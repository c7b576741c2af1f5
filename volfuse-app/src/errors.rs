//! Error types for the command-line application.

use std::path::PathBuf;
use thiserror::Error;
use volfuse_fuse::FuseError;

/// Errors that abort the whole batch.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Cannot read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Fuse(#[from] FuseError),
}
