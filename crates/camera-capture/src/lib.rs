//! Camera Capture Library for the Drowsiness Monitor
//!
//! Provides the frame type shared by every stage of the pipeline and the
//! contract a frame source must satisfy. Acquisition backends (V4L2,
//! recorded traces) live outside this crate and implement [`FrameSource`].

pub mod frame;
pub mod source;

pub use frame::VideoFrame;
pub use source::FrameSource;

use thiserror::Error;

/// Camera error types
#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Failed to open camera: {0}")]
    Open(String),

    #[error("Streaming error: {0}")]
    Stream(String),

    #[error("End of stream after {frames} frames")]
    EndOfStream { frames: u32 },
}

impl CameraError {
    /// Whether the source simply ran out of frames (as opposed to failing)
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, CameraError::EndOfStream { .. })
    }
}
