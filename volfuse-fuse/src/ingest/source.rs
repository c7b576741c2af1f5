//! Sources of per-frame view images.

use crate::FuseError;
use crate::config::view_path_in;
use std::path::PathBuf;
use volfuse_data::{DataError, ViewAxis, ViewImage, load_view_image};

/// Trait for anything that can supply the view images of a frame.
pub trait ViewSource: Send + Sync {
    /// Load the image of `view` for `frame`.
    fn load(&self, frame: i64, view: ViewAxis) -> Result<ViewImage, DataError>;

    /// Batch-level precondition, checked once before the first frame.
    fn check(&self) -> Result<(), FuseError> {
        Ok(())
    }
}

/// Reads `<dir>/<%04d frame><suffix>.png` files.
#[derive(Debug, Clone)]
pub struct DirectoryViewSource {
    dir: PathBuf,
}

impl DirectoryViewSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, frame: i64, view: ViewAxis) -> PathBuf {
        view_path_in(&self.dir, frame, view)
    }
}

impl ViewSource for DirectoryViewSource {
    fn load(&self, frame: i64, view: ViewAxis) -> Result<ViewImage, DataError> {
        load_view_image(self.path(frame, view))
    }

    fn check(&self) -> Result<(), FuseError> {
        if self.dir.is_dir() {
            Ok(())
        } else {
            Err(FuseError::InputDirMissing(self.dir.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_directory_is_fatal() {
        let source = DirectoryViewSource::new("/definitely/not/a/volfuse/dir");
        assert!(matches!(source.check(), Err(FuseError::InputDirMissing(_))));
    }

    #[test]
    fn test_missing_view_is_an_error() {
        let source = DirectoryViewSource::new(std::env::temp_dir());
        assert!(source.check().is_ok());
        assert!(source.load(987_654, ViewAxis::PosY).is_err());
    }

    #[test]
    fn test_path_naming() {
        let source = DirectoryViewSource::new("renders");
        assert_eq!(
            source.path(42, ViewAxis::PosZ),
            PathBuf::from("renders").join("0042pz.png")
        );
    }
}
