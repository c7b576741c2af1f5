//! Volfuse Fusion Crate
//!
//! Fuses six axis-aligned depth+color views (−x, −y, −z, +x, +y, +z) of an
//! object into sparse color and opacity volumes, one per animation frame.
//!
//! ## Modules
//!
//! - [`ingest`]: View image sources and pixel-to-voxel extraction
//! - [`reconstruction`]: Alpha-weighted voxel accumulation and volume assembly
//! - [`pipeline`]: Frame sequence driver and batch reports
//! - [`config`]: Batch configuration
//!
//! ## Example
//!
//! ```ignore
//! use volfuse_fuse::{FrameSequenceDriver, FusionConfig};
//!
//! let runtime = volfuse_data::initialize();
//! let config = FusionConfig::new("renders", "volumes").with_frames(1, 25);
//! let writer = runtime.writer(config.format);
//! let report = FrameSequenceDriver::new(config, writer).run()?;
//! ```

pub mod config;
pub mod error;
pub mod ingest;
pub mod pipeline;
pub mod reconstruction;

pub use config::FusionConfig;
pub use error::FuseError;
pub use ingest::{DirectoryViewSource, ViewSampleExtractor, ViewSource};
pub use pipeline::{BatchReport, CancelFlag, FrameSequenceDriver, FrameStats};
pub use reconstruction::{VolumeAssembler, VoxelAccumulator};
