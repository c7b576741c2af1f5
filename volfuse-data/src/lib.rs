//! Volfuse Data Crate
//!
//! Data types and I/O for multi-view volume fusion: the six axis-aligned view
//! identifiers, sparse color/opacity volumes, view image decoding and the
//! writers that persist a fused frame. This crate holds no fusion logic.

pub mod error;
pub mod view_image;
pub mod runtime;
pub mod types;
pub mod view;
pub mod volume;
pub mod writer;

pub use error::DataError;
pub use view_image::{ViewImage, load_view_image};
pub use runtime::{Runtime, initialize};
pub use types::VoxelContribution;
pub use view::ViewAxis;
pub use volume::{ColorVolume, FrameVolume, OpacityVolume, SparseVolume};
pub use writer::{JsonVolumeWriter, OutputFormat, PlyVolumeWriter, VolumeWriter};
