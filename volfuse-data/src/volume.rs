//! Sparse voxel volumes and the per-frame volume pair.

use glam::{IVec3, Mat4, Vec3};
use std::collections::HashMap;
use std::collections::hash_map;

/// Default name of the color grid.
pub const COLOR_GRID_NAME: &str = "RGB";
/// Default name of the opacity grid.
pub const OPACITY_GRID_NAME: &str = "Alpha";

/// A named sparse grid storing one value per occupied integer coordinate.
///
/// Absence of a coordinate means "unset" (zero opacity). Only touched voxels
/// are stored, so memory scales with the occupied shell rather than `N³`.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseVolume<T> {
    name: String,
    voxels: HashMap<IVec3, T>,
}

/// Per-voxel RGB color grid.
pub type ColorVolume = SparseVolume<Vec3>;
/// Per-voxel accumulated opacity grid.
pub type OpacityVolume = SparseVolume<f32>;

impl<T> SparseVolume<T> {
    /// Create an empty grid with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            voxels: HashMap::new(),
        }
    }

    /// Create an empty grid with room for `capacity` voxels.
    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            voxels: HashMap::with_capacity(capacity),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Store a value, returning the previous one at that coordinate.
    pub fn insert(&mut self, coord: IVec3, value: T) -> Option<T> {
        self.voxels.insert(coord, value)
    }

    pub fn get(&self, coord: IVec3) -> Option<&T> {
        self.voxels.get(&coord)
    }

    pub fn contains(&self, coord: IVec3) -> bool {
        self.voxels.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.voxels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    /// Iterate voxels in unspecified order.
    pub fn iter(&self) -> hash_map::Iter<'_, IVec3, T> {
        self.voxels.iter()
    }

    /// Occupied coordinates in lexicographic `(x, y, z)` order.
    pub fn coords_sorted(&self) -> Vec<IVec3> {
        let mut coords: Vec<IVec3> = self.voxels.keys().copied().collect();
        coords.sort_unstable_by_key(|c| c.to_array());
        coords
    }

    /// Inclusive bounding box of occupied voxels.
    pub fn bounds(&self) -> Option<(IVec3, IVec3)> {
        let mut keys = self.voxels.keys();
        let first = *keys.next()?;
        Some(keys.fold((first, first), |(lo, hi), &c| (lo.min(c), hi.max(c))))
    }
}

/// The exportable result of fusing one frame: co-indexed color and opacity
/// grids sharing one index-to-world transform.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameVolume {
    pub frame: i64,
    pub resolution: u32,
    pub color: ColorVolume,
    pub opacity: OpacityVolume,
    pub transform: Mat4,
}

impl FrameVolume {
    /// An empty frame volume with the default grid names.
    pub fn empty(frame: i64, resolution: u32, transform: Mat4) -> Self {
        Self {
            frame,
            resolution,
            color: ColorVolume::new(COLOR_GRID_NAME),
            opacity: OpacityVolume::new(OPACITY_GRID_NAME),
            transform,
        }
    }

    /// Number of occupied voxels (both grids hold the same coordinates).
    pub fn active_voxel_count(&self) -> usize {
        self.opacity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opacity.is_empty()
    }

    pub fn bounds(&self) -> Option<(IVec3, IVec3)> {
        self.opacity.bounds()
    }

    /// Color and opacity at a coordinate, if occupied.
    pub fn sample(&self, coord: IVec3) -> Option<(Vec3, f32)> {
        let opacity = *self.opacity.get(coord)?;
        let color = *self.color.get(coord)?;
        Some((color, opacity))
    }

    /// Occupied voxels in lexicographic coordinate order.
    pub fn voxels_sorted(&self) -> Vec<(IVec3, Vec3, f32)> {
        self.opacity
            .coords_sorted()
            .into_iter()
            .filter_map(|c| self.sample(c).map(|(color, opacity)| (c, color, opacity)))
            .collect()
    }
}
