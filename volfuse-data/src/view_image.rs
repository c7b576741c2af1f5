//! Decoded view images.

use crate::DataError;
use std::path::Path;
use tracing::debug;

/// A decoded view image: row-major, interleaved 8-bit channels.
///
/// At least four channels (RGBA) are required since depth is carried in alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewImage {
    width: u32,
    height: u32,
    channels: u32,
    data: Vec<u8>,
}

impl ViewImage {
    /// Wrap a raw buffer, validating its size and channel count.
    pub fn new(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Result<Self, DataError> {
        if channels < 4 {
            return Err(DataError::InvalidBuffer(format!(
                "expected at least 4 channels, got {}",
                channels
            )));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(DataError::InvalidBuffer(format!(
                "{}x{}x{} image needs {} bytes, got {}",
                width,
                height,
                channels,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u32 {
        self.channels
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// First four channels of the pixel at `row`, `col`.
    pub fn pixel(&self, row: u32, col: u32) -> [u8; 4] {
        let offset = (row as usize * self.width as usize + col as usize) * self.channels as usize;
        let px = &self.data[offset..offset + 4];
        [px[0], px[1], px[2], px[3]]
    }
}

/// Decode a view image from disk.
///
/// Images without an alpha channel carry no depth and are rejected; all other
/// pixel formats are converted to 8-bit RGBA.
#[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_view_image<P: AsRef<Path>>(path: P) -> Result<ViewImage, DataError> {
    let path = path.as_ref();
    let decoded = image::open(path)?;
    if !decoded.color().has_alpha() {
        return Err(DataError::MissingAlpha {
            path: path.to_path_buf(),
        });
    }
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    debug!("Decoded {}x{} view image", width, height);
    ViewImage::new(width, height, 4, rgba.into_raw())
}
