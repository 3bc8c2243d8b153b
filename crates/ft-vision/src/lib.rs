//! Frame sources, presence detection and display for the focus tracker.
//!
//! The monitor loop only sees the traits in [`source`]. Two backends
//! implement them:
//! - [`trace`]: replays a recorded presence trace, no camera needed
//! - `webcam` (feature `opencv`): a live capture device, a Haar cascade
//!   face detector and a highgui window

mod config;
mod error;
pub mod source;
pub mod trace;
#[cfg(feature = "opencv")]
mod webcam;

pub use config::CameraConfig;
pub use error::VisionError;
pub use source::{
    Captured, DisplaySink, FrameSkip, FrameSource, Headless, Overlay, PresenceDetector,
};
pub use trace::{PresenceTrace, TraceDetector, TraceFrame, TraceSource};
#[cfg(feature = "opencv")]
pub use webcam::{Camera, CascadeDetector, Window};

/// Whether this build includes the webcam backend.
pub const WEBCAM_AVAILABLE: bool = cfg!(feature = "opencv");
