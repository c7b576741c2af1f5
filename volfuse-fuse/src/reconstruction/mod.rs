//! Volume reconstruction
//!
//! Accumulating view contributions into sparse grids and assembling the
//! exported frame volume.

pub mod accumulator;
pub mod assembler;

pub use accumulator::{VoxelAccumulator, VoxelSample};
pub use assembler::{VolumeAssembler, default_rotation};
