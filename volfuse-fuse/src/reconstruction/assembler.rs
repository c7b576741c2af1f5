//! Final assembly of a frame's volume pair

use glam::Mat4;
use std::f32::consts::FRAC_PI_2;
use volfuse_data::{ColorVolume, FrameVolume, OpacityVolume};

/// Rotation applied to every exported volume: 90° about +X, so the exported
/// "up" matches the target renderer.
pub fn default_rotation() -> Mat4 {
    Mat4::from_rotation_x(FRAC_PI_2)
}

/// Attaches the output transform to finished grids.
///
/// This only changes the index-to-world transform; voxel data is untouched.
#[derive(Debug, Clone, Copy)]
pub struct VolumeAssembler {
    transform: Mat4,
}

impl VolumeAssembler {
    pub fn new() -> Self {
        Self {
            transform: default_rotation(),
        }
    }

    /// Use a different output transform.
    pub fn with_rotation(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn transform(&self) -> Mat4 {
        self.transform
    }

    pub fn assemble(
        &self,
        frame: i64,
        resolution: u32,
        color: ColorVolume,
        opacity: OpacityVolume,
    ) -> FrameVolume {
        FrameVolume {
            frame,
            resolution,
            color,
            opacity,
            transform: self.transform,
        }
    }
}

impl Default for VolumeAssembler {
    fn default() -> Self {
        Self::new()
    }
}
