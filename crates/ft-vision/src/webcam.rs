//! OpenCV webcam backend.

use std::path::Path;

use chrono::Utc;
use opencv::core::{Mat, Point, Rect, Scalar, Size, Vector};
use opencv::prelude::*;
use opencv::{highgui, imgproc, objdetect, videoio};

use crate::VisionError;
use crate::config::CameraConfig;
use crate::source::{Captured, DisplaySink, FrameSource, Overlay, PresenceDetector};

/// A capture device. Released when dropped.
pub struct Camera {
    capture: videoio::VideoCapture,
}

impl Camera {
    pub fn open(index: i32) -> Result<Self, VisionError> {
        let unavailable = |reason: String| VisionError::CameraUnavailable { index, reason };

        let capture = videoio::VideoCapture::new(index, videoio::CAP_ANY)
            .map_err(|e| unavailable(e.to_string()))?;
        if !capture.is_opened().map_err(|e| unavailable(e.to_string()))? {
            return Err(unavailable("device did not open".to_string()));
        }

        tracing::info!(index, "camera opened");
        Ok(Self { capture })
    }
}

impl FrameSource for Camera {
    type Image = Mat;

    fn read(&mut self) -> Result<Option<Captured<Mat>>, VisionError> {
        let mut frame = Mat::default();
        let ok = self
            .capture
            .read(&mut frame)
            .map_err(|e| VisionError::FrameRead(e.to_string()))?;

        if !ok || frame.empty() {
            return Err(VisionError::FrameRead("empty frame".to_string()));
        }

        Ok(Some(Captured {
            image: frame,
            at: Utc::now(),
        }))
    }
}

/// Haar cascade face detector.
pub struct CascadeDetector {
    classifier: objdetect::CascadeClassifier,
    frame_width: Option<i32>,
    grayscale: bool,
    scale_factor: f64,
    min_neighbors: i32,
    min_face_size: i32,
}

impl CascadeDetector {
    pub fn load(path: &Path, config: &CameraConfig) -> Result<Self, VisionError> {
        let load_err = |reason: String| VisionError::CascadeLoad {
            path: path.to_path_buf(),
            reason,
        };

        let path_str = path
            .to_str()
            .ok_or_else(|| load_err("path is not valid UTF-8".to_string()))?;
        let classifier =
            objdetect::CascadeClassifier::new(path_str).map_err(|e| load_err(e.to_string()))?;
        if classifier.empty().map_err(|e| load_err(e.to_string()))? {
            return Err(load_err("classifier is empty".to_string()));
        }

        tracing::info!(path = %path.display(), "face classifier loaded");
        Ok(Self {
            classifier,
            frame_width: config.frame_width,
            grayscale: config.grayscale,
            scale_factor: config.scale_factor,
            min_neighbors: config.min_neighbors,
            min_face_size: config.min_face_size,
        })
    }

    fn detect_faces(&mut self, image: &Mat) -> opencv::Result<usize> {
        let mut faces = Vector::<Rect>::new();
        self.classifier.detect_multi_scale(
            image,
            &mut faces,
            self.scale_factor,
            self.min_neighbors,
            0,
            Size::new(self.min_face_size, self.min_face_size),
            Size::default(),
        )?;
        Ok(faces.len())
    }

    fn detect_prepared(&mut self, frame: &Mat) -> opencv::Result<usize> {
        let resized = match self.frame_width {
            Some(width) if width > 0 && frame.cols() > width => {
                let height = frame.rows() * width / frame.cols();
                let mut out = Mat::default();
                imgproc::resize(
                    frame,
                    &mut out,
                    Size::new(width, height),
                    0.0,
                    0.0,
                    imgproc::INTER_LINEAR,
                )?;
                Some(out)
            }
            _ => None,
        };
        let src = resized.as_ref().unwrap_or(frame);

        if self.grayscale {
            let mut gray = Mat::default();
            imgproc::cvt_color_def(src, &mut gray, imgproc::COLOR_BGR2GRAY)?;
            self.detect_faces(&gray)
        } else {
            self.detect_faces(src)
        }
    }
}

impl PresenceDetector<Mat> for CascadeDetector {
    fn detect(&mut self, image: &Mat) -> Result<bool, VisionError> {
        let faces = self
            .detect_prepared(image)
            .map_err(|e| VisionError::Detection(e.to_string()))?;
        tracing::trace!(faces, "detection pass");
        Ok(faces > 0)
    }
}

/// A highgui window. Destroyed when dropped.
pub struct Window {
    name: String,
}

impl Window {
    pub fn open(name: &str) -> Result<Self, VisionError> {
        highgui::named_window(name, highgui::WINDOW_AUTOSIZE)
            .map_err(|e| VisionError::Display(e.to_string()))?;
        Ok(Self {
            name: name.to_string(),
        })
    }

    fn draw_line(frame: &mut Mat, text: &str, y: i32) -> opencv::Result<()> {
        imgproc::put_text(
            frame,
            text,
            Point::new(10, y),
            imgproc::FONT_HERSHEY_SIMPLEX,
            1.0,
            Scalar::new(255.0, 255.0, 255.0, 0.0),
            2,
            imgproc::LINE_8,
            false,
        )
    }
}

impl DisplaySink<Mat> for Window {
    fn render(&mut self, image: &mut Mat, overlay: &Overlay) -> Result<(), VisionError> {
        let display_err = |e: opencv::Error| VisionError::Display(e.to_string());

        if let Some(current) = overlay.current_text() {
            Self::draw_line(image, &current, 30).map_err(display_err)?;
        }
        Self::draw_line(image, &overlay.total_text(), 60).map_err(display_err)?;
        highgui::imshow(&self.name, &*image).map_err(display_err)
    }

    fn poll_cancel(&mut self) -> Result<bool, VisionError> {
        let key = highgui::wait_key(1).map_err(|e| VisionError::Display(e.to_string()))?;
        Ok(key >= 0)
    }
}

impl Drop for Window {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_window(&self.name) {
            tracing::debug!(error = %e, "failed to destroy window");
        }
    }
}
