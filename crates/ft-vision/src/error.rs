//! Vision errors.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisionError {
    /// The capture device could not be opened.
    #[error("failed to open camera {index}: {reason}")]
    CameraUnavailable { index: i32, reason: String },

    /// The face classifier could not be loaded.
    #[error("failed to load classifier {}: {reason}", path.display())]
    CascadeLoad { path: PathBuf, reason: String },

    /// No frame could be read from an open source.
    #[error("cannot read frame: {0}")]
    FrameRead(String),

    /// The detector failed on a frame.
    #[error("face detection failed: {0}")]
    Detection(String),

    /// The display window failed.
    #[error("display error: {0}")]
    Display(String),

    /// The binary was built without a webcam backend.
    #[error("webcam support is not compiled in (rebuild with the `camera` feature)")]
    Unsupported,

    /// A presence trace could not be read.
    #[error("failed to read trace {}", path.display())]
    TraceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A presence trace line is invalid.
    #[error("trace line {line}: {message}")]
    TraceParse { line: usize, message: String },
}

impl VisionError {
    /// Whether the error happened while acquiring the capture device.
    pub const fn is_device_error(&self) -> bool {
        matches!(self, Self::CameraUnavailable { .. } | Self::Unsupported)
    }
}
