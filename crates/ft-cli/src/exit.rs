//! Process exit codes for fatal errors.

use ft_log::LogError;
use ft_vision::VisionError;

/// Configuration or any other unclassified failure.
pub const FAILURE: u8 = 1;
/// The camera could not be opened, or webcam support is not compiled in.
pub const CAMERA_UNAVAILABLE: u8 = 2;
/// The face classifier could not be loaded.
pub const CLASSIFIER_LOAD: u8 = 3;
/// The focus log could not be opened.
pub const LOG_OPEN: u8 = 4;

/// Picks the exit code for the first recognized cause in the error chain.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(vision) = cause.downcast_ref::<VisionError>() {
            if vision.is_device_error() {
                return CAMERA_UNAVAILABLE;
            }
            if matches!(vision, VisionError::CascadeLoad { .. }) {
                return CLASSIFIER_LOAD;
            }
        }
        if let Some(LogError::Open { .. }) = cause.downcast_ref::<LogError>() {
            return LOG_OPEN;
        }
    }
    FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io;
    use std::path::PathBuf;

    use anyhow::Context;

    #[test]
    fn maps_camera_errors() {
        let err = Err::<(), _>(VisionError::CameraUnavailable {
            index: 0,
            reason: "busy".to_string(),
        })
        .context("failed to open camera")
        .unwrap_err();
        assert_eq!(exit_code_for(&err), CAMERA_UNAVAILABLE);

        let err = anyhow::Error::new(VisionError::Unsupported);
        assert_eq!(exit_code_for(&err), CAMERA_UNAVAILABLE);
    }

    #[test]
    fn maps_classifier_errors() {
        let err = anyhow::Error::new(VisionError::CascadeLoad {
            path: PathBuf::from("missing.xml"),
            reason: "not found".to_string(),
        });
        assert_eq!(exit_code_for(&err), CLASSIFIER_LOAD);
    }

    #[test]
    fn maps_log_open_errors() {
        let err = Err::<(), _>(LogError::Open {
            path: PathBuf::from("/nope/focus_log.txt"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        })
        .context("failed to start")
        .unwrap_err();
        assert_eq!(exit_code_for(&err), LOG_OPEN);
    }

    #[test]
    fn other_errors_are_generic_failures() {
        let err = anyhow::anyhow!("bad config");
        assert_eq!(exit_code_for(&err), FAILURE);

        let err = anyhow::Error::new(LogError::Write {
            path: PathBuf::from("focus_log.txt"),
            source: io::Error::from(io::ErrorKind::Other),
        });
        assert_eq!(exit_code_for(&err), FAILURE);
    }
}
