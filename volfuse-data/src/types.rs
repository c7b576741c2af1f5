//! Core data types shared between view extraction and voxel accumulation.
//!
//! These are transient CPU-side values; the persistent per-frame structures
//! live in [`crate::volume`].

use glam::{IVec3, Vec3};

/// A single candidate observation of a voxel, produced from one view pixel.
///
/// Contributions have no identity beyond their coordinate: several may target
/// the same voxel and must be merged, never overwritten.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelContribution {
    /// Integer grid coordinate in volume space.
    pub coord: IVec3,
    /// RGB color (0-1 range).
    pub color: Vec3,
    /// Blending weight; every view pixel contributes 1.0.
    pub weight: f32,
}

impl VoxelContribution {
    /// Create a new contribution with an explicit weight.
    pub fn new(coord: IVec3, color: Vec3, weight: f32) -> Self {
        Self {
            coord,
            color,
            weight,
        }
    }

    /// Create a unit-weight contribution.
    pub fn unit(coord: IVec3, color: Vec3) -> Self {
        Self::new(coord, color, 1.0)
    }

    /// Whether every component of the coordinate lies in `[0, resolution - 1]`.
    pub fn in_bounds(&self, resolution: u32) -> bool {
        let max = resolution as i64 - 1;
        self.coord
            .to_array()
            .iter()
            .all(|&c| (0..=max).contains(&(c as i64)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_contribution() {
        let c = VoxelContribution::unit(IVec3::new(1, 2, 3), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(c.weight, 1.0);
        assert_eq!(c.coord, IVec3::new(1, 2, 3));
    }

    #[test]
    fn test_in_bounds_edges() {
        let color = Vec3::ONE;
        assert!(VoxelContribution::unit(IVec3::ZERO, color).in_bounds(4));
        assert!(VoxelContribution::unit(IVec3::splat(3), color).in_bounds(4));
        assert!(!VoxelContribution::unit(IVec3::new(4, 0, 0), color).in_bounds(4));
        assert!(!VoxelContribution::unit(IVec3::new(0, -1, 0), color).in_bounds(4));
        assert!(!VoxelContribution::unit(IVec3::new(0, 0, 4), color).in_bounds(4));
    }

    #[test]
    fn test_zero_resolution_rejects_everything() {
        assert!(!VoxelContribution::unit(IVec3::ZERO, Vec3::ONE).in_bounds(0));
    }
}
