//! Frame sequence driver: fuse and write every frame of a batch.

use crate::FuseError;
use crate::config::FusionConfig;
use crate::ingest::{DirectoryViewSource, Extraction, ViewSampleExtractor, ViewSource};
use crate::pipeline::report::{BatchReport, FrameFailure, FrameStats};
use crate::reconstruction::{VolumeAssembler, VoxelAccumulator};
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};
use volfuse_data::{FrameVolume, ViewAxis, VolumeWriter};

/// Shared flag that stops a batch between frames.
pub type CancelFlag = Arc<AtomicBool>;

enum FrameOutcome {
    Written(FrameStats),
    Failed(FuseError),
    NotStarted,
}

/// Runs the fusion pipeline over a frame range.
///
/// Frames are independent: each one gets its own accumulator and volume,
/// created fresh and dropped after the write. View load failures skip the
/// view, write failures skip the frame; neither stops the batch.
pub struct FrameSequenceDriver<'w> {
    config: FusionConfig,
    writer: &'w dyn VolumeWriter,
    source: Box<dyn ViewSource + 'w>,
    extractor: ViewSampleExtractor,
    assembler: VolumeAssembler,
    cancel: Option<CancelFlag>,
}

impl<'w> FrameSequenceDriver<'w> {
    /// Create a driver reading view images from `config.input_dir`.
    pub fn new(config: FusionConfig, writer: &'w dyn VolumeWriter) -> Self {
        let source = DirectoryViewSource::new(config.input_dir.clone());
        let extractor = ViewSampleExtractor::new(config.resolution, config.depth_threshold);
        Self {
            config,
            writer,
            source: Box::new(source),
            extractor,
            assembler: VolumeAssembler::new(),
            cancel: None,
        }
    }

    /// Replace the view image source.
    pub fn with_source(mut self, source: impl ViewSource + 'w) -> Self {
        self.source = Box::new(source);
        self
    }

    pub fn with_assembler(mut self, assembler: VolumeAssembler) -> Self {
        self.assembler = assembler;
        self
    }

    /// Stop the batch before the next frame once `flag` is set.
    pub fn with_cancel(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Fatal precondition: the view source must exist.
    pub fn check_input(&self) -> Result<(), FuseError> {
        self.source.check()
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Load one view, logging and skipping it on failure.
    fn extract_view(&self, frame: i64, view: ViewAxis) -> Option<Extraction> {
        match self.source.load(frame, view) {
            Ok(image) => Some(self.extractor.extract(&image, view)),
            Err(source) => {
                warn!("{}", FuseError::View { frame, view, source });
                None
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn extract_views(&self, frame: i64) -> Vec<(ViewAxis, Option<Extraction>)> {
        use rayon::prelude::*;
        ViewAxis::ALL
            .as_slice()
            .par_iter()
            .map(|&view| (view, self.extract_view(frame, view)))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn extract_views(&self, frame: i64) -> Vec<(ViewAxis, Option<Extraction>)> {
        ViewAxis::ALL
            .iter()
            .map(|&view| (view, self.extract_view(frame, view)))
            .collect()
    }

    /// Fuse the six views of `frame` into a volume without writing it.
    ///
    /// A frame whose views all fail still yields an (empty) volume.
    pub fn fuse_frame(&self, frame: i64) -> (FrameVolume, FrameStats) {
        let resolution = self.config.resolution;
        let mut stats = FrameStats::new(frame);
        let mut accumulator = VoxelAccumulator::new(resolution);

        for (view, extraction) in self.extract_views(frame) {
            let Some(extraction) = extraction else {
                stats.skipped_views.push(view);
                continue;
            };
            stats.views_loaded += 1;
            stats.rejected += extraction.rejected;
            let mut partial = VoxelAccumulator::new(resolution);
            partial.extend(extraction.contributions);
            accumulator.merge(partial);
        }

        stats.dropped = accumulator.dropped();
        let (color, opacity) = accumulator.finish();
        let volume = self.assembler.assemble(frame, resolution, color, opacity);
        stats.voxels = volume.active_voxel_count();
        (volume, stats)
    }

    fn write_frame(&self, volume: &FrameVolume) -> Result<std::path::PathBuf, FuseError> {
        let path = self.config.output_path(volume.frame);
        let attempts = self.config.write_retries + 1;
        let mut attempt = 1;
        loop {
            match self.writer.write(&path, volume) {
                Ok(()) => return Ok(path),
                Err(source) if attempt >= attempts => {
                    return Err(FuseError::Write {
                        frame: volume.frame,
                        path,
                        source,
                    });
                }
                Err(e) => {
                    warn!(
                        "Write attempt {}/{} for frame {} failed: {}",
                        attempt, attempts, volume.frame, e
                    );
                    attempt += 1;
                }
            }
        }
    }

    /// Fuse and write a single frame.
    #[tracing::instrument(skip(self))]
    pub fn process_frame(&self, frame: i64) -> Result<FrameStats, FuseError> {
        let (volume, mut stats) = self.fuse_frame(frame);
        if self.config.verbose {
            info!(
                "Frame {}: {} views, {} voxels, {} pixels rejected, {} contributions dropped",
                frame, stats.views_loaded, stats.voxels, stats.rejected, stats.dropped
            );
        } else {
            debug!(
                "Frame {}: {} views, {} voxels, {} rejected, {} dropped",
                frame, stats.views_loaded, stats.voxels, stats.rejected, stats.dropped
            );
        }

        let path = self.write_frame(&volume)?;
        info!("Processed frame {} and saved as {}", frame, path.display());
        stats.path = Some(path);
        Ok(stats)
    }

    fn run_frame(&self, frame: i64) -> FrameOutcome {
        if self.is_cancelled() {
            return FrameOutcome::NotStarted;
        }
        match self.process_frame(frame) {
            Ok(stats) => FrameOutcome::Written(stats),
            Err(e) => {
                warn!("{}", e);
                FrameOutcome::Failed(e)
            }
        }
    }

    #[cfg(feature = "parallel")]
    fn run_frames(&self) -> Result<Vec<(i64, FrameOutcome)>, FuseError> {
        use rayon::prelude::*;
        if self.config.jobs <= 1 {
            return Ok(self.config.frames().map(|f| (f, self.run_frame(f))).collect());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .build()
            .map_err(|e| FuseError::ThreadPool(e.to_string()))?;
        debug!("Processing frames on {} threads", self.config.jobs);
        Ok(pool.install(|| {
            self.config
                .frames()
                .into_par_iter()
                .map(|f| (f, self.run_frame(f)))
                .collect()
        }))
    }

    #[cfg(not(feature = "parallel"))]
    fn run_frames(&self) -> Result<Vec<(i64, FrameOutcome)>, FuseError> {
        if self.config.jobs > 1 {
            warn!("Built without the `parallel` feature, processing frames sequentially");
        }
        Ok(self.config.frames().map(|f| (f, self.run_frame(f))).collect())
    }

    /// Process every frame of the configured range.
    ///
    /// Returns an error only for batch-level failures (bad configuration,
    /// missing input directory, uncreatable output directory).
    pub fn run(&self) -> Result<BatchReport, FuseError> {
        self.config.validate()?;
        self.check_input()?;
        fs::create_dir_all(&self.config.output_dir).map_err(|source| FuseError::OutputDir {
            path: self.config.output_dir.clone(),
            source,
        })?;

        info!(
            "Fusing frames {}..={} at resolution {}",
            self.config.start_frame, self.config.end_frame, self.config.resolution
        );

        let mut report = BatchReport::default();
        for (frame, outcome) in self.run_frames()? {
            match outcome {
                FrameOutcome::Written(stats) => report.written.push(stats),
                FrameOutcome::Failed(e) => report.failed.push(FrameFailure {
                    frame,
                    error: e.to_string(),
                }),
                FrameOutcome::NotStarted => report.not_started.push(frame),
            }
        }
        report.cancelled = !report.not_started.is_empty();
        if report.cancelled {
            warn!("Batch cancelled, {} frames not started", report.not_started.len());
        }

        info!(
            "Batch finished: {} written, {} failed",
            report.written.len(),
            report.failed.len()
        );
        Ok(report)
    }
}
