//! Error taxonomy reported to control clients

use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::Status;

/// Suggestion attached when the mirrored app cannot be found
pub const SUGGEST_OPEN_APP: &str = "Please make sure the mirroring app is open and visible";

/// Suggestion attached when the mirror window is too small to hold device content
pub const SUGGEST_RESIZE: &str = "Try making the mirroring window larger";

/// Dispatcher-level error.
///
/// Every variant is rendered into an [`ErrorBody`]; none of them ever reach the
/// transport as a failure status.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("{message}")]
    NotFound {
        message: String,
        details: Option<String>,
    },

    #[error("Detected window seems too small for device content")]
    WindowTooSmall {
        window_size: (i32, i32),
        content_size: (i32, i32),
    },

    #[error("Failed to parse window dimensions")]
    ParseFailure { raw_output: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    UnsupportedOperation(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Injection failed: {0}")]
    InjectionFailure(String),

    #[error("{what} timed out after {after_ms}ms")]
    Timeout { what: String, after_ms: u64 },
}

impl ControlError {
    /// Short machine-readable name of the variant, used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            ControlError::NotFound { .. } => "not_found",
            ControlError::WindowTooSmall { .. } => "window_too_small",
            ControlError::ParseFailure { .. } => "parse_failure",
            ControlError::InvalidArgument(_) => "invalid_argument",
            ControlError::UnsupportedOperation(_) => "unsupported_operation",
            ControlError::UnknownAction(_) => "unknown_action",
            ControlError::InjectionFailure(_) => "injection_failure",
            ControlError::Timeout { .. } => "timeout",
        }
    }

    /// Render into the client-visible error shape
    pub fn to_body(&self) -> ErrorBody {
        let (details, suggestion) = match self {
            ControlError::NotFound { details, .. } => (
                details.as_ref().map(|d| Value::String(d.clone())),
                Some(SUGGEST_OPEN_APP),
            ),
            ControlError::WindowTooSmall {
                window_size,
                content_size,
            } => (
                Some(json!({
                    "window_size": [window_size.0, window_size.1],
                    "calculated_content": [content_size.0, content_size.1],
                })),
                Some(SUGGEST_RESIZE),
            ),
            ControlError::ParseFailure { raw_output } => {
                (Some(json!({ "raw_output": raw_output })), None)
            }
            ControlError::Timeout { .. } => (None, Some(SUGGEST_OPEN_APP)),
            _ => (None, None),
        };

        ErrorBody {
            status: Status::Error,
            error: self.to_string(),
            details,
            suggestion: suggestion.map(str::to_string),
        }
    }
}

/// `{status:"error", error, details?, suggestion?}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub status: Status,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorBody {
    /// Error body with only a message, used by the transport for malformed requests
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            error: error.into(),
            details: None,
            suggestion: None,
        }
    }
}

/// Result type alias for dispatcher operations
pub type ControlResult<T> = Result<T, ControlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_action_body_has_only_status_and_error() {
        let body = ControlError::UnknownAction("frobnicate".to_string()).to_body();
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({"status": "error", "error": "Unknown action: frobnicate"})
        );
    }

    #[test]
    fn test_window_too_small_reports_both_sizes() {
        let body = ControlError::WindowTooSmall {
            window_size: (150, 300),
            content_size: (130, 252),
        }
        .to_body();
        let details = body.details.unwrap();
        assert_eq!(details["window_size"], json!([150, 300]));
        assert_eq!(details["calculated_content"], json!([130, 252]));
        assert_eq!(body.suggestion.as_deref(), Some(SUGGEST_RESIZE));
    }
}
