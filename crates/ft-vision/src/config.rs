//! Webcam and detector settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Capture, preprocessing and classifier parameters.
///
/// The defaults match a full-resolution color pipeline that runs detection on
/// every frame. A lighter setup would raise `frame_skip`, set a
/// `frame_width` and enable `grayscale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Capture device index.
    pub index: i32,

    /// Path to the Haar cascade XML file.
    pub cascade_path: PathBuf,

    /// Run detection on every Nth frame. 0 and 1 both mean every frame.
    pub frame_skip: u32,

    /// Downscale frames to this width before detection (aspect preserved).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_width: Option<i32>,

    /// Convert frames to grayscale before detection.
    pub grayscale: bool,

    /// Classifier image pyramid scale step.
    pub scale_factor: f64,

    /// Neighbor rectangles required to keep a detection.
    pub min_neighbors: i32,

    /// Smallest face edge in pixels. 0 uses the classifier default.
    pub min_face_size: i32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            cascade_path: PathBuf::from("haarcascade_frontalface_default.xml"),
            frame_skip: 1,
            frame_width: None,
            grayscale: false,
            scale_factor: 1.1,
            min_neighbors: 3,
            min_face_size: 0,
        }
    }
}
