//! View ingestion
//!
//! Loading the six view images of a frame and turning their pixels into
//! voxel contributions.

pub mod extract;
pub mod source;

pub use extract::{Extraction, ViewSampleExtractor, depth_index, is_reliable, sample_depth};
pub use source::{DirectoryViewSource, ViewSource};
