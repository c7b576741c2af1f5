//! Error types for fusion and batch processing.

use std::path::PathBuf;
use thiserror::Error;
use volfuse_data::DataError;

/// Errors raised by the fusion pipeline.
///
/// Only [`FuseError::InputDirMissing`], [`FuseError::InvalidConfig`] and
/// [`FuseError::OutputDir`] abort a batch; view and write failures are
/// recorded per frame and processing continues.
#[derive(Debug, Error)]
pub enum FuseError {
    #[error("Input directory does not exist: {}", .0.display())]
    InputDirMissing(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to load view {view} of frame {frame}: {source}")]
    View {
        frame: i64,
        view: volfuse_data::ViewAxis,
        source: DataError,
    },

    #[error("Failed to write frame {frame} to {}: {source}", .path.display())]
    Write {
        frame: i64,
        path: PathBuf,
        source: DataError,
    },

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}
