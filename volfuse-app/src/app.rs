//! Application setup and batch run.

use crate::errors::AppError;
use tracing::{info, warn};
use volfuse_fuse::{BatchReport, FrameSequenceDriver, FusionConfig};

/// Logging configuration.
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// `debug` when verbose, `info` otherwise. `RUST_LOG` still wins.
    pub fn for_verbosity(verbose: bool) -> Self {
        Self {
            level: if verbose { "debug" } else { "info" }.to_string(),
        }
    }
}

/// Builder for configuring and running a fusion batch.
pub struct App {
    config: FusionConfig,
    logging: LoggingConfig,
}

impl App {
    pub fn new(config: FusionConfig) -> Self {
        let logging = LoggingConfig::for_verbosity(config.verbose);
        Self { config, logging }
    }

    /// Configure logging.
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging = config;
        self
    }

    /// Initialize logging and the volume runtime, then process every frame.
    pub fn run(self) -> Result<BatchReport, AppError> {
        self.init_logging();

        let runtime = volfuse_data::initialize();
        let writer = runtime.writer(self.config.format);
        info!(
            "Reading views from {}, writing {} volumes to {}",
            self.config.input_dir.display(),
            self.config.format,
            self.config.output_dir.display()
        );

        let report = FrameSequenceDriver::new(self.config, writer).run()?;
        for failure in &report.failed {
            warn!("Frame {} was not written: {}", failure.frame, failure.error);
        }
        info!(
            "{} of {} frames written ({} voxels total)",
            report.written.len(),
            report.frame_count(),
            report.total_voxels()
        );
        Ok(report)
    }

    fn init_logging(&self) {
        // try_init: a subscriber may already be installed (tests, embedding).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.logging.level)),
            )
            .with_target(false)
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbose_raises_log_level() {
        assert_eq!(LoggingConfig::for_verbosity(true).level, "debug");
        assert_eq!(LoggingConfig::for_verbosity(false).level, "info");
        assert_eq!(LoggingConfig::default().level, "info");
    }

    #[test]
    fn test_run_with_missing_input_fails() {
        let config = FusionConfig::new("/no/such/volfuse/renders", std::env::temp_dir())
            .with_frames(1, 1);
        let result = App::new(config)
            .with_logging(LoggingConfig::default())
            .run();
        assert!(matches!(
            result,
            Err(AppError::Fuse(volfuse_fuse::FuseError::InputDirMissing(_)))
        ));
    }
}
