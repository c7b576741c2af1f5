//! Volume writers.
//!
//! A writer persists one [`FrameVolume`] (both grids plus their transform) to
//! a file. Output is staged next to the target and renamed into place, so a
//! frame is either fully present on disk or absent.

use crate::DataError;
use crate::volume::FrameVolume;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Supported on-disk volume formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Sparse grid document (serde_json).
    #[default]
    Json,
    /// ASCII PLY point cloud, one vertex per occupied voxel.
    Ply,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Json, OutputFormat::Ply];

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Ply => "ply",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "ply" => Ok(OutputFormat::Ply),
            _ => Err(DataError::UnknownFormat(s.to_string())),
        }
    }
}

/// Trait for sinks that persist a fused frame.
pub trait VolumeWriter: Send + Sync {
    /// Format produced by this writer.
    fn format(&self) -> OutputFormat;

    /// Serialize a volume into `out`.
    fn write_to(&self, out: &mut dyn Write, volume: &FrameVolume) -> Result<(), DataError>;

    /// Write a volume to `path`, replacing any existing file.
    fn write(&self, path: &Path, volume: &FrameVolume) -> Result<(), DataError> {
        let staging = staging_path(path);
        let result = (|| {
            let mut out = BufWriter::new(File::create(&staging)?);
            self.write_to(&mut out, volume)?;
            out.flush()?;
            Ok::<_, DataError>(())
        })();
        if let Err(e) = result {
            fs::remove_file(&staging).ok();
            return Err(e);
        }
        if let Err(e) = fs::rename(&staging, path) {
            fs::remove_file(&staging).ok();
            return Err(e.into());
        }
        debug!(
            "Wrote {} voxels to {}",
            volume.active_voxel_count(),
            path.display()
        );
        Ok(())
    }
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

#[derive(Serialize)]
struct GridDocument<'a, T: Serialize> {
    name: &'a str,
    kind: &'static str,
    voxels: Vec<VoxelEntry<T>>,
}

#[derive(Serialize)]
struct VoxelEntry<T: Serialize> {
    coord: [i32; 3],
    value: T,
}

#[derive(Serialize)]
struct VolumeDocument<'a> {
    frame: i64,
    resolution: u32,
    transform: [f32; 16],
    active_voxels: usize,
    grids: (GridDocument<'a, [f32; 3]>, GridDocument<'a, f32>),
}

/// Writes volumes as a JSON sparse-grid document.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonVolumeWriter {
    pretty: bool,
}

impl JsonVolumeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl VolumeWriter for JsonVolumeWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn write_to(&self, out: &mut dyn Write, volume: &FrameVolume) -> Result<(), DataError> {
        let voxels = volume.voxels_sorted();
        let color = GridDocument {
            name: volume.color.name(),
            kind: "vec3f",
            voxels: voxels
                .iter()
                .map(|(c, color, _)| VoxelEntry {
                    coord: c.to_array(),
                    value: color.to_array(),
                })
                .collect(),
        };
        let opacity = GridDocument {
            name: volume.opacity.name(),
            kind: "float",
            voxels: voxels
                .iter()
                .map(|(c, _, a)| VoxelEntry {
                    coord: c.to_array(),
                    value: *a,
                })
                .collect(),
        };
        let doc = VolumeDocument {
            frame: volume.frame,
            resolution: volume.resolution,
            transform: volume.transform.to_cols_array(),
            active_voxels: voxels.len(),
            grids: (color, opacity),
        };
        if self.pretty {
            serde_json::to_writer_pretty(&mut *out, &doc)?;
        } else {
            serde_json::to_writer(&mut *out, &doc)?;
        }
        writeln!(out)?;
        Ok(())
    }
}

/// Writes volumes as an ASCII PLY point cloud.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlyVolumeWriter;

impl VolumeWriter for PlyVolumeWriter {
    fn format(&self) -> OutputFormat {
        OutputFormat::Ply
    }

    fn write_to(&self, out: &mut dyn Write, volume: &FrameVolume) -> Result<(), DataError> {
        let voxels = volume.voxels_sorted();
        let t = volume.transform.to_cols_array();

        writeln!(out, "ply")?;
        writeln!(out, "format ascii 1.0")?;
        writeln!(out, "comment frame {}", volume.frame)?;
        writeln!(out, "comment resolution {}", volume.resolution)?;
        writeln!(out, "comment grids {} {}", volume.color.name(), volume.opacity.name())?;
        let cols: Vec<String> = t.iter().map(|v| v.to_string()).collect();
        writeln!(out, "comment transform {}", cols.join(" "))?;
        writeln!(out, "element vertex {}", voxels.len())?;
        writeln!(out, "property int x")?;
        writeln!(out, "property int y")?;
        writeln!(out, "property int z")?;
        writeln!(out, "property float red")?;
        writeln!(out, "property float green")?;
        writeln!(out, "property float blue")?;
        writeln!(out, "property float opacity")?;
        writeln!(out, "end_header")?;

        for (c, color, opacity) in voxels {
            writeln!(
                out,
                "{} {} {} {} {} {} {}",
                c.x, c.y, c.z, color.x, color.y, color.z, opacity
            )?;
        }
        Ok(())
    }
}
