//! Process-wide volume I/O runtime.
//!
//! [`initialize`] must be called once before any frame is written. It is
//! idempotent: later calls return the same instance.

use crate::writer::{JsonVolumeWriter, OutputFormat, PlyVolumeWriter, VolumeWriter};
use std::sync::OnceLock;
use tracing::debug;

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

/// Registry of the volume writers available to the process.
pub struct Runtime {
    json: JsonVolumeWriter,
    ply: PlyVolumeWriter,
}

impl Runtime {
    fn new() -> Self {
        debug!("Initializing volume runtime ({} formats)", OutputFormat::ALL.len());
        Self {
            json: JsonVolumeWriter::new(),
            ply: PlyVolumeWriter,
        }
    }

    /// Writer for the given format.
    pub fn writer(&self, format: OutputFormat) -> &dyn VolumeWriter {
        match format {
            OutputFormat::Json => &self.json,
            OutputFormat::Ply => &self.ply,
        }
    }

    /// All formats this runtime can write.
    pub fn formats(&self) -> &'static [OutputFormat] {
        &OutputFormat::ALL
    }
}

/// Initialize the runtime, or return the already-initialized one.
pub fn initialize() -> &'static Runtime {
    RUNTIME.get_or_init(Runtime::new)
}
