//! The six fixed orthographic views of the capture rig.

use crate::DataError;
use glam::{IVec3, Vec3};
use std::fmt;
use std::str::FromStr;

/// One of the six axis-aligned view directions.
///
/// The set is closed: each view carries a hand-specified permutation and
/// reflection into volume space that encodes the rig geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewAxis {
    NegX,
    NegY,
    NegZ,
    PosX,
    PosY,
    PosZ,
}

impl ViewAxis {
    /// All views in file-suffix order (`nx, ny, nz, px, py, pz`).
    pub const ALL: [ViewAxis; 6] = [
        ViewAxis::NegX,
        ViewAxis::NegY,
        ViewAxis::NegZ,
        ViewAxis::PosX,
        ViewAxis::PosY,
        ViewAxis::PosZ,
    ];

    /// Filename suffix of this view's image.
    pub fn suffix(self) -> &'static str {
        match self {
            ViewAxis::NegX => "nx",
            ViewAxis::NegY => "ny",
            ViewAxis::NegZ => "nz",
            ViewAxis::PosX => "px",
            ViewAxis::PosY => "py",
            ViewAxis::PosZ => "pz",
        }
    }

    /// Signed axis label, e.g. `-x`.
    pub fn label(self) -> &'static str {
        match self {
            ViewAxis::NegX => "-x",
            ViewAxis::NegY => "-y",
            ViewAxis::NegZ => "-z",
            ViewAxis::PosX => "+x",
            ViewAxis::PosY => "+y",
            ViewAxis::PosZ => "+z",
        }
    }

    /// Principal viewing direction.
    pub fn direction(self) -> Vec3 {
        match self {
            ViewAxis::NegX => Vec3::NEG_X,
            ViewAxis::NegY => Vec3::NEG_Y,
            ViewAxis::NegZ => Vec3::NEG_Z,
            ViewAxis::PosX => Vec3::X,
            ViewAxis::PosY => Vec3::Y,
            ViewAxis::PosZ => Vec3::Z,
        }
    }

    /// Assumed "up" vector of the camera: +X for the ±y views, +Y otherwise.
    pub fn up(self) -> Vec3 {
        match self {
            ViewAxis::NegY | ViewAxis::PosY => Vec3::X,
            _ => Vec3::Y,
        }
    }

    /// Map an image sample into volume coordinates.
    ///
    /// `depth` is the along-axis index, `row`/`col` the pixel position and
    /// `resolution` the cube edge length `N`.
    pub fn remap(self, depth: i32, row: i32, col: i32, resolution: u32) -> IVec3 {
        let last = resolution as i32 - 1;
        let (x, y, z) = (depth, row, col);
        match self {
            ViewAxis::NegX => IVec3::new(last - x, y, z),
            ViewAxis::NegY => IVec3::new(last - z, last - y, x),
            ViewAxis::NegZ => IVec3::new(last - y, last - x, z),
            ViewAxis::PosX => IVec3::new(x, last - y, z),
            ViewAxis::PosY => IVec3::new(last - z, y, last - x),
            ViewAxis::PosZ => IVec3::new(y, x, z),
        }
    }
}

impl fmt::Display for ViewAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewAxis {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        ViewAxis::ALL
            .into_iter()
            .find(|v| v.suffix() == lowered || v.label() == lowered)
            .ok_or_else(|| DataError::UnknownView(s.to_string()))
    }
}
