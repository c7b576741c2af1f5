//! Batch processing over a frame range.

pub mod driver;
pub mod report;

pub use driver::{CancelFlag, FrameSequenceDriver};
pub use report::{BatchReport, FrameFailure, FrameStats};
