//! Capture error types

use shared_protocol::ControlError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Permission denied - screen recording permission required")]
    PermissionDenied,

    #[error("No displays found")]
    NoDisplays,

    #[error("Invalid capture region {width}x{height}")]
    InvalidRegion { width: i32, height: i32 },

    #[error("Frame capture failed: {0}")]
    CaptureFailed(String),

    #[error("Unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Platform not supported")]
    UnsupportedPlatform,

    #[error("Platform error: {0}")]
    Platform(String),
}

pub type CaptureResult<T> = Result<T, CaptureError>;

impl From<CaptureError> for ControlError {
    fn from(err: CaptureError) -> Self {
        match err {
            CaptureError::InvalidRegion { .. } => ControlError::InvalidArgument(err.to_string()),
            other => ControlError::InjectionFailure(other.to_string()),
        }
    }
}
