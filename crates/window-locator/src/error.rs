//! Window locator error types

use shared_protocol::ControlError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("{message}")]
    NotFound {
        message: String,
        details: Option<String>,
    },

    #[error("Window query timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("Failed to parse window dimensions")]
    ParseFailure { raw_output: String },

    #[error("Failed to execute AppleScript: {0}")]
    ScriptFailed(String),

    #[error("Failed to launch osascript: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("AppleScript requires macOS")]
    UnsupportedPlatform,
}

pub type LocateResult<T> = Result<T, LocateError>;

impl From<LocateError> for ControlError {
    fn from(err: LocateError) -> Self {
        match err {
            LocateError::NotFound { message, details } => {
                ControlError::NotFound { message, details }
            }
            LocateError::Timeout { after_ms } => ControlError::Timeout {
                what: "Window query".to_string(),
                after_ms,
            },
            LocateError::ParseFailure { raw_output } => ControlError::ParseFailure { raw_output },
            unsupported @ LocateError::UnsupportedPlatform => {
                ControlError::UnsupportedOperation(unsupported.to_string())
            }
            other => ControlError::InjectionFailure(other.to_string()),
        }
    }
}
