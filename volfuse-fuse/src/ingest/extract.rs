//! View sample extraction: one decoded view image to voxel contributions.

use glam::Vec3;
use tracing::trace;
use volfuse_data::{ViewAxis, ViewImage, VoxelContribution};

/// Depth encoded by a normalized alpha value: opaque is nearest.
pub fn sample_depth(alpha: f32) -> f32 {
    1.0 - alpha
}

/// Along-axis voxel index for a depth in `[0, 1]`.
pub fn depth_index(depth: f32, resolution: u32) -> i32 {
    (depth * (resolution.saturating_sub(1)) as f32).round() as i32
}

/// Whether a depth lies inside the accepted band `[t, 1 - t]`.
pub fn is_reliable(depth: f32, threshold: f32) -> bool {
    !(depth < threshold || depth > 1.0 - threshold)
}

/// The contributions of one view, plus how many pixels were filtered out.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub contributions: Vec<VoxelContribution>,
    /// Pixels discarded by the depth threshold.
    pub rejected: usize,
}

impl Extraction {
    pub fn len(&self) -> usize {
        self.contributions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }
}

/// Converts view pixels into voxel contributions.
///
/// Each pixel at image row `y`, column `z` yields the depth index
/// `x = round((1 - a) * (N - 1))`, which the view's fixed axis remap turns into
/// a volume coordinate. Pixels whose depth falls outside `[t, 1 - t]` are
/// dropped.
#[derive(Debug, Clone, Copy)]
pub struct ViewSampleExtractor {
    resolution: u32,
    threshold: f32,
}

impl ViewSampleExtractor {
    pub fn new(resolution: u32, threshold: f32) -> Self {
        Self {
            resolution,
            threshold,
        }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Extract every reliable pixel of `image` as seen from `view`.
    pub fn extract(&self, image: &ViewImage, view: ViewAxis) -> Extraction {
        let mut out = Extraction {
            contributions: Vec::with_capacity(image.width() as usize * image.height() as usize),
            rejected: 0,
        };

        for y in 0..image.height() {
            for z in 0..image.width() {
                let [r, g, b, a] = image.pixel(y, z);
                let depth = sample_depth(a as f32 / 255.0);
                if !is_reliable(depth, self.threshold) {
                    out.rejected += 1;
                    continue;
                }
                let x = depth_index(depth, self.resolution);
                let coord = view.remap(x, y as i32, z as i32, self.resolution);
                let color = Vec3::new(r as f32, g as f32, b as f32) / 255.0;
                out.contributions.push(VoxelContribution::unit(coord, color));
            }
        }

        trace!(
            "View {}: {} contributions, {} rejected",
            view,
            out.contributions.len(),
            out.rejected
        );
        out
    }
}
