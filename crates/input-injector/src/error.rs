//! Input injection error types

use shared_protocol::ControlError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InjectorError {
    #[error("Permission denied - accessibility permission required")]
    PermissionDenied,

    #[error("Failed to inject input: {0}")]
    InjectionFailed(String),

    #[error("{0}")]
    Unsupported(String),

    #[error("Platform not supported")]
    UnsupportedPlatform,

    #[error("Platform error: {0}")]
    Platform(String),
}

pub type InjectorResult<T> = Result<T, InjectorError>;

impl From<InjectorError> for ControlError {
    fn from(err: InjectorError) -> Self {
        match err {
            InjectorError::Unsupported(what) => ControlError::UnsupportedOperation(what),
            other => ControlError::InjectionFailure(other.to_string()),
        }
    }
}
