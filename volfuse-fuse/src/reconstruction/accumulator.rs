//! Alpha-weighted accumulation of voxel contributions

use glam::{IVec3, Vec3};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use volfuse_data::volume::{COLOR_GRID_NAME, OPACITY_GRID_NAME};
use volfuse_data::{ColorVolume, OpacityVolume, VoxelContribution};

/// Running color and opacity of one voxel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoxelSample {
    pub color: Vec3,
    pub opacity: f32,
}

impl VoxelSample {
    /// Fold another weighted observation into this one.
    ///
    /// `A1 = A0 + w`, `C1 = (C0 * A0 + Cn * w) / A1`. Opacity is never clamped.
    fn blend(&mut self, color: Vec3, weight: f32) {
        let total = self.opacity + weight;
        self.color = (self.color * self.opacity + color * weight) / total;
        self.opacity = total;
    }
}

/// Merges contributions from all views of a frame into one sparse volume.
///
/// All views are equal-weight observations; there is no view priority and the
/// result does not depend on arrival order.
#[derive(Debug, Clone)]
pub struct VoxelAccumulator {
    resolution: u32,
    voxels: HashMap<IVec3, VoxelSample>,
    dropped: usize,
}

impl VoxelAccumulator {
    pub fn new(resolution: u32) -> Self {
        Self {
            resolution,
            voxels: HashMap::new(),
            dropped: 0,
        }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    /// Add one contribution.
    ///
    /// Returns `false` when it was dropped: coordinate outside `[0, N-1]` on
    /// any axis, or a weight that is not a positive finite number.
    pub fn add(&mut self, contribution: VoxelContribution) -> bool {
        if !contribution.in_bounds(self.resolution) {
            self.dropped += 1;
            return false;
        }
        self.insert(contribution.coord, contribution.color, contribution.weight)
    }

    pub fn extend<I>(&mut self, contributions: I)
    where
        I: IntoIterator<Item = VoxelContribution>,
    {
        for c in contributions {
            self.add(c);
        }
    }

    /// Combine a partial accumulator (e.g. one built from a single view) into
    /// this one. Equivalent to having added the other's contributions here.
    pub fn merge(&mut self, other: VoxelAccumulator) {
        self.dropped += other.dropped;
        for (coord, sample) in other.voxels {
            let contribution = VoxelContribution::new(coord, sample.color, sample.opacity);
            self.add(contribution);
        }
    }

    fn insert(&mut self, coord: IVec3, color: Vec3, weight: f32) -> bool {
        if !(weight.is_finite() && weight > 0.0) {
            self.dropped += 1;
            return false;
        }
        match self.voxels.entry(coord) {
            Entry::Occupied(mut entry) => entry.get_mut().blend(color, weight),
            Entry::Vacant(entry) => {
                entry.insert(VoxelSample {
                    color,
                    opacity: weight,
                });
            }
        }
        true
    }

    pub fn get(&self, coord: IVec3) -> Option<&VoxelSample> {
        self.voxels.get(&coord)
    }

    /// Number of contributions rejected so far.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Split into the co-indexed color and opacity grids.
    pub fn finish(self) -> (ColorVolume, OpacityVolume) {
        let mut color = ColorVolume::with_capacity(COLOR_GRID_NAME, self.voxels.len());
        let mut opacity = OpacityVolume::with_capacity(OPACITY_GRID_NAME, self.voxels.len());
        for (coord, sample) in self.voxels {
            color.insert(coord, sample.color);
            opacity.insert(coord, sample.opacity);
        }
        (color, opacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    const GREEN: Vec3 = Vec3::new(0.0, 1.0, 0.0);

    fn at(coord: IVec3, color: Vec3) -> VoxelContribution {
        VoxelContribution::unit(coord, color)
    }

    #[test]
    fn test_merge_is_commutative() {
        let coord = IVec3::new(1, 1, 1);
        let mut ab = VoxelAccumulator::new(4);
        ab.add(at(coord, RED));
        ab.add(at(coord, GREEN));
        let mut ba = VoxelAccumulator::new(4);
        ba.add(at(coord, GREEN));
        ba.add(at(coord, RED));

        for acc in [&ab, &ba] {
            let s = acc.get(coord).unwrap();
            assert_relative_eq!(s.opacity, 2.0);
            assert_relative_eq!(s.color.x, 0.5);
            assert_relative_eq!(s.color.y, 0.5);
            assert_relative_eq!(s.color.z, 0.0);
        }
    }

    #[test]
    fn test_single_contribution_is_stored_unchanged() {
        let coord = IVec3::new(0, 2, 3);
        let color = Vec3::new(0.2, 0.4, 0.6);
        let mut acc = VoxelAccumulator::new(4);
        assert!(acc.add(at(coord, color)));
        let (colors, opacities) = acc.finish();
        assert_eq!(colors.get(coord), Some(&color));
        assert_eq!(opacities.get(coord), Some(&1.0));
    }

    #[test]
    fn test_out_of_range_is_dropped() {
        let mut acc = VoxelAccumulator::new(4);
        for coord in [
            IVec3::new(4, 0, 0),
            IVec3::new(0, 4, 0),
            IVec3::new(0, 0, 4),
            IVec3::new(-1, 0, 0),
            IVec3::new(0, -1, 0),
            IVec3::new(0, 0, -1),
        ] {
            assert!(!acc.add(at(coord, RED)));
        }
        assert!(acc.is_empty());
        assert_eq!(acc.dropped(), 6);
    }

    #[test]
    fn test_non_positive_weight_never_records_a_voxel() {
        let mut acc = VoxelAccumulator::new(4);
        assert!(!acc.add(VoxelContribution::new(IVec3::ZERO, RED, 0.0)));
        assert!(!acc.add(VoxelContribution::new(IVec3::ZERO, RED, f32::NAN)));
        assert!(acc.get(IVec3::ZERO).is_none());
    }

    #[test]
    fn test_opacity_is_not_clamped() {
        let mut acc = VoxelAccumulator::new(2);
        acc.extend((0..6).map(|_| at(IVec3::ONE, GREEN)));
        assert_relative_eq!(acc.get(IVec3::ONE).unwrap().opacity, 6.0);
    }

    #[test]
    fn test_partial_merge_matches_sequential() {
        let coord = IVec3::new(2, 0, 1);
        let blue = Vec3::new(0.0, 0.0, 1.0);

        let mut sequential = VoxelAccumulator::new(4);
        sequential.extend([at(coord, RED), at(coord, GREEN), at(coord, blue)]);

        let mut first = VoxelAccumulator::new(4);
        first.extend([at(coord, RED), at(coord, GREEN)]);
        let mut second = VoxelAccumulator::new(4);
        second.extend([at(coord, blue), at(IVec3::new(9, 0, 0), blue)]);
        second.merge(first);

        let a = sequential.get(coord).unwrap();
        let b = second.get(coord).unwrap();
        assert_relative_eq!(a.opacity, b.opacity);
        assert_relative_eq!(a.color.x, b.color.x, epsilon = 1e-6);
        assert_relative_eq!(a.color.y, b.color.y, epsilon = 1e-6);
        assert_relative_eq!(a.color.z, b.color.z, epsilon = 1e-6);
        assert_relative_eq!(b.color.z, 1.0 / 3.0, epsilon = 1e-6);
        assert_eq!(second.dropped(), 1);
    }

    #[test]
    fn test_finish_grids_are_co_indexed() {
        let mut acc = VoxelAccumulator::new(4);
        acc.extend([
            at(IVec3::new(0, 0, 0), RED),
            at(IVec3::new(3, 3, 3), GREEN),
            at(IVec3::new(3, 3, 3), RED),
        ]);
        let (colors, opacities) = acc.finish();
        assert_eq!(colors.coords_sorted(), opacities.coords_sorted());
        assert_eq!(colors.name(), "RGB");
        assert_eq!(opacities.name(), "Alpha");
    }
}
