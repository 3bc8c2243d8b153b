//! Seams between the monitor loop and the vision backends.

use chrono::{DateTime, Duration, Utc};
use ft_core::format_duration;

use crate::VisionError;

/// A frame together with the instant it was captured.
#[derive(Debug, Clone)]
pub struct Captured<I> {
    pub image: I,
    pub at: DateTime<Utc>,
}

/// Produces frames in capture order.
pub trait FrameSource {
    type Image;

    /// Reads the next frame. `Ok(None)` means the stream ended.
    fn read(&mut self) -> Result<Option<Captured<Self::Image>>, VisionError>;
}

/// Decides whether a face is visible in a frame.
pub trait PresenceDetector<I> {
    fn detect(&mut self, image: &I) -> Result<bool, VisionError>;
}

/// Shows frames with the focus overlay and reports cancellation.
pub trait DisplaySink<I> {
    fn render(&mut self, image: &mut I, overlay: &Overlay) -> Result<(), VisionError>;

    /// Returns `true` once the user asked to stop.
    fn poll_cancel(&mut self) -> Result<bool, VisionError>;
}

/// Status text drawn over each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlay {
    /// Elapsed time of the open session, if any.
    pub current: Option<Duration>,
    /// Cumulative logged focus time.
    pub total: Duration,
}

impl Overlay {
    pub fn current_text(&self) -> Option<String> {
        self.current
            .map(|d| format!("Current Focus: {}", format_duration(d)))
    }

    pub fn total_text(&self) -> String {
        format!("Total Focused Time: {}", format_duration(self.total))
    }
}

/// A display that draws nothing and never cancels.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl<I> DisplaySink<I> for Headless {
    fn render(&mut self, _image: &mut I, _overlay: &Overlay) -> Result<(), VisionError> {
        Ok(())
    }

    fn poll_cancel(&mut self) -> Result<bool, VisionError> {
        Ok(false)
    }
}

/// Runs detection on every Nth frame only.
#[derive(Debug, Clone)]
pub struct FrameSkip {
    stride: u32,
    counter: u32,
}

impl FrameSkip {
    /// A stride of 0 or 1 processes every frame.
    pub fn new(stride: u32) -> Self {
        Self {
            stride: stride.max(1),
            counter: 0,
        }
    }

    pub const fn stride(&self) -> u32 {
        self.stride
    }

    /// Advances by one frame and reports whether it should be processed.
    ///
    /// The first frame is always processed.
    pub fn advance(&mut self) -> bool {
        let process = self.counter == 0;
        self.counter = (self.counter + 1) % self.stride;
        process
    }
}

impl Default for FrameSkip {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;

    #[test]
    fn frame_skip_processes_every_nth_frame() {
        let mut skip = FrameSkip::new(3);
        let processed: Vec<bool> = (0..7).map(|_| skip.advance()).collect();
        assert_eq!(
            processed,
            vec![true, false, false, true, false, false, true]
        );
    }

    #[test]
    fn frame_skip_zero_and_one_process_everything() {
        for stride in [0, 1] {
            let mut skip = FrameSkip::new(stride);
            assert_eq!(skip.stride(), 1);
            assert!((0..5).all(|_| skip.advance()));
        }
    }

    #[test]
    fn overlay_text_while_active() {
        let overlay = Overlay {
            current: Some(Duration::seconds(75)),
            total: Duration::seconds(3 * 3600 + 5),
        };
        let text = format!(
            "{}\n{}",
            overlay.current_text().unwrap(),
            overlay.total_text()
        );
        assert_snapshot!(text, @r"
        Current Focus: 00h:01m:15s
        Total Focused Time: 03h:00m:05s
        ");
    }

    #[test]
    fn overlay_text_while_idle() {
        let overlay = Overlay {
            current: None,
            total: Duration::zero(),
        };
        assert_eq!(overlay.current_text(), None);
        assert_eq!(overlay.total_text(), "Total Focused Time: 00h:00m:00s");
    }

    #[test]
    fn headless_never_cancels() {
        let mut display = Headless;
        let overlay = Overlay {
            current: None,
            total: Duration::zero(),
        };
        DisplaySink::<()>::render(&mut display, &mut (), &overlay).unwrap();
        assert!(!DisplaySink::<()>::poll_cancel(&mut display).unwrap());
    }
}
