//! Live webcam monitor.

use std::io::Write;

use anyhow::Result;

use crate::Config;
use crate::monitor::MonitorOutcome;

/// Title of the preview window.
#[cfg(feature = "camera")]
const WINDOW_TITLE: &str = "Focus Tracker";

/// Runs the monitor against the configured camera until a key is pressed
/// in the preview window or the camera stops delivering frames.
#[cfg(feature = "camera")]
pub fn run<W: Write>(out: W, config: &Config) -> Result<MonitorOutcome> {
    use anyhow::Context;
    use ft_core::FocusTracker;
    use ft_log::FocusLog;
    use ft_vision::{Camera, CascadeDetector, FrameSkip, Window};

    use crate::monitor::Monitor;

    let mut camera = Camera::open(config.camera.index).context("failed to start camera")?;
    let mut window = Window::open(WINDOW_TITLE)?;
    let mut detector = CascadeDetector::load(&config.camera.cascade_path, &config.camera)?;
    let log = FocusLog::open(&config.log_path)?;

    Monitor::new(
        FocusTracker::new(config.tracker),
        log,
        FrameSkip::new(config.camera.frame_skip),
        out,
    )
    .run(&mut camera, &mut detector, &mut window)
}

/// Without the `camera` feature there is no capture backend.
#[cfg(not(feature = "camera"))]
pub fn run<W: Write>(_out: W, _config: &Config) -> Result<MonitorOutcome> {
    Err(ft_vision::VisionError::Unsupported.into())
}
