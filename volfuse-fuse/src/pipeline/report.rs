//! Per-frame statistics and batch summaries.

use std::path::PathBuf;
use volfuse_data::ViewAxis;

/// What happened while fusing one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameStats {
    pub frame: i64,
    /// Where the frame was written, once it has been.
    pub path: Option<PathBuf>,
    pub views_loaded: usize,
    pub skipped_views: Vec<ViewAxis>,
    /// Occupied voxels in the fused volume.
    pub voxels: usize,
    /// Pixels discarded by the depth threshold.
    pub rejected: usize,
    /// Contributions discarded by the accumulator bounds check.
    pub dropped: usize,
}

impl FrameStats {
    pub fn new(frame: i64) -> Self {
        Self {
            frame,
            ..Self::default()
        }
    }
}

/// A frame whose output could not be produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameFailure {
    pub frame: i64,
    pub error: String,
}

/// Summary of a batch run. Frames are listed in ascending order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchReport {
    pub written: Vec<FrameStats>,
    pub failed: Vec<FrameFailure>,
    /// Frames never started because the batch was cancelled.
    pub not_started: Vec<i64>,
    pub cancelled: bool,
}

impl BatchReport {
    /// Every frame was written.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && !self.cancelled
    }

    pub fn frame_count(&self) -> usize {
        self.written.len() + self.failed.len() + self.not_started.len()
    }

    pub fn total_voxels(&self) -> usize {
        self.written.iter().map(|s| s.voxels).sum()
    }
}
