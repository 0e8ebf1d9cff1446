//! Device mapping error types

use shared_protocol::ControlError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MappingError {
    #[error("window {window:?} leaves only {content:?} for device content")]
    WindowTooSmall {
        window: (i32, i32),
        content: (i32, i32),
    },

    #[error("mirror size must be positive, got {width}x{height}")]
    InvalidMirror { width: i32, height: i32 },
}

pub type MappingResult<T> = Result<T, MappingError>;

impl From<MappingError> for ControlError {
    fn from(err: MappingError) -> Self {
        match err {
            MappingError::WindowTooSmall { window, content } => ControlError::WindowTooSmall {
                window_size: window,
                content_size: content,
            },
            err @ MappingError::InvalidMirror { .. } => {
                ControlError::InvalidArgument(err.to_string())
            }
        }
    }
}
