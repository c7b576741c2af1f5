//! Batch fusion configuration.

use crate::FuseError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use volfuse_data::{OutputFormat, ViewAxis};

/// Default first frame of the batch.
pub const DEFAULT_START_FRAME: i64 = 1;
/// Default last frame of the batch (inclusive).
pub const DEFAULT_END_FRAME: i64 = 25;
/// Default cube edge length `N`.
pub const DEFAULT_RESOLUTION: u32 = 128;
/// Default fraction of the depth range rejected at each end.
pub const DEFAULT_DEPTH_THRESHOLD: f32 = 0.05;
/// Default output filename prefix.
pub const DEFAULT_PREFIX: &str = "volume";
/// Largest accepted resolution; keeps every coordinate inside `i32`.
pub const MAX_RESOLUTION: u32 = 1 << 16;

/// Configuration for a batch of frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub start_frame: i64,
    pub end_frame: i64,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub prefix: String,
    pub resolution: u32,
    pub depth_threshold: f32,
    pub format: OutputFormat,
    /// Worker threads for frame-level parallelism (needs the `parallel` feature).
    pub jobs: usize,
    /// Extra attempts for a failed frame write.
    pub write_retries: u32,
    pub verbose: bool,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            start_frame: DEFAULT_START_FRAME,
            end_frame: DEFAULT_END_FRAME,
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
            prefix: DEFAULT_PREFIX.to_string(),
            resolution: DEFAULT_RESOLUTION,
            depth_threshold: DEFAULT_DEPTH_THRESHOLD,
            format: OutputFormat::default(),
            jobs: 1,
            write_retries: 0,
            verbose: false,
        }
    }
}

impl FusionConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Set the inclusive frame range.
    pub fn with_frames(mut self, start: i64, end: i64) -> Self {
        self.start_frame = start;
        self.end_frame = end;
        self
    }

    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_depth_threshold(mut self, threshold: f32) -> Self {
        self.depth_threshold = threshold;
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn with_write_retries(mut self, retries: u32) -> Self {
        self.write_retries = retries;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check ranges before any frame is processed.
    pub fn validate(&self) -> Result<(), FuseError> {
        if self.resolution == 0 || self.resolution > MAX_RESOLUTION {
            return Err(FuseError::InvalidConfig(format!(
                "resolution must be in 1..={}, got {}",
                MAX_RESOLUTION, self.resolution
            )));
        }
        if self.start_frame < 0 {
            return Err(FuseError::InvalidConfig(format!(
                "frames must be non-negative for zero-padded names, got start frame {}",
                self.start_frame
            )));
        }
        if self.start_frame > self.end_frame {
            return Err(FuseError::InvalidConfig(format!(
                "start frame {} is after end frame {}",
                self.start_frame, self.end_frame
            )));
        }
        if !(0.0..0.5).contains(&self.depth_threshold) {
            return Err(FuseError::InvalidConfig(format!(
                "depth threshold must be in [0, 0.5), got {}",
                self.depth_threshold
            )));
        }
        if self.jobs == 0 {
            return Err(FuseError::InvalidConfig("jobs must be at least 1".into()));
        }
        Ok(())
    }

    /// Frames of the batch in ascending order.
    pub fn frames(&self) -> std::ops::RangeInclusive<i64> {
        self.start_frame..=self.end_frame
    }

    /// Path of one view image: `<input>/<%04d frame><suffix>.png`.
    pub fn view_path(&self, frame: i64, view: ViewAxis) -> PathBuf {
        view_path_in(&self.input_dir, frame, view)
    }

    /// Output path of a frame: `<output>/<prefix>_<%04d frame>.<ext>`.
    pub fn output_path(&self, frame: i64) -> PathBuf {
        self.output_dir.join(format!(
            "{}_{:04}.{}",
            self.prefix,
            frame,
            self.format.extension()
        ))
    }
}

pub(crate) fn view_path_in(dir: &Path, frame: i64, view: ViewAxis) -> PathBuf {
    dir.join(format!("{:04}{}.png", frame, view.suffix()))
}
