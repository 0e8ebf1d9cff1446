//! Mirror window discovery through System Events

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use shared_protocol::WindowFrame;
use tracing::{debug, info};

use crate::{LocateError, LocateResult, ScriptRunner, escape_applescript};

/// Application whose window is located when none is configured
pub const DEFAULT_APP_NAME: &str = "iPhone Mirroring";

/// Bound on one window query
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// What the query script prints, as one JSON object
#[derive(Debug, Deserialize)]
struct QueryReply {
    found: bool,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    width: Option<f64>,
    #[serde(default)]
    height: Option<f64>,
    #[serde(default)]
    app: Option<String>,
    #[serde(default)]
    bundle: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Finds the first window of the first process whose name contains `app_name`
pub struct WindowLocator {
    runner: Arc<dyn ScriptRunner>,
    app_name: String,
    timeout: Duration,
}

impl WindowLocator {
    pub fn new(
        runner: Arc<dyn ScriptRunner>,
        app_name: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            runner,
            app_name: app_name.into(),
            timeout,
        }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Query the window system for the mirror window's frame.
    ///
    /// Not retried; a missing window is reported as [`LocateError::NotFound`].
    pub fn locate(&self) -> LocateResult<WindowFrame> {
        let script = query_script(&self.app_name);
        let output = self.runner.run(&script, self.timeout)?;

        if !output.success {
            return Err(LocateError::ScriptFailed(output.stderr));
        }

        let raw = output.stdout.trim();
        let reply: QueryReply = serde_json::from_str(raw).map_err(|e| {
            debug!("Unparseable window query output: {}", e);
            LocateError::ParseFailure {
                raw_output: raw.to_string(),
            }
        })?;

        if !reply.found {
            return Err(LocateError::NotFound {
                message: format!("{} app not found or not active", self.app_name),
                details: Some(
                    reply
                        .error
                        .unwrap_or_else(|| format!("{} app not found", self.app_name)),
                ),
            });
        }

        let (Some(x), Some(y), Some(width), Some(height)) =
            (reply.x, reply.y, reply.width, reply.height)
        else {
            return Err(LocateError::ParseFailure {
                raw_output: raw.to_string(),
            });
        };

        let frame = WindowFrame {
            x: x as i32,
            y: y as i32,
            width: width as i32,
            height: height as i32,
            app_name: reply.app,
            bundle_id: reply.bundle,
        };

        info!(
            app = frame.app_name.as_deref().unwrap_or("Unknown"),
            bundle = frame.bundle_id.as_deref().unwrap_or("Unknown"),
            "Detected window {}x{} at ({}, {})",
            frame.width,
            frame.height,
            frame.x,
            frame.y
        );
        Ok(frame)
    }
}

/// AppleScript printing `{"found":true,"x":..,"y":..,"width":..,"height":..,"app":..,"bundle":..}`
/// or `{"found":false,"error":..}`
fn query_script(app_name: &str) -> String {
    let app = escape_applescript(app_name);
    format!(
        r#"
on jsonText(value)
    set AppleScript's text item delimiters to "\\"
    set parts to text items of (value as text)
    set AppleScript's text item delimiters to "\\\\"
    set value to parts as text
    set AppleScript's text item delimiters to quote
    set parts to text items of value
    set AppleScript's text item delimiters to "\\" & quote
    set value to parts as text
    set AppleScript's text item delimiters to ""
    return quote & value & quote
end jsonText

tell application "System Events"
    try
        set mirrorApp to first application process whose name contains "{app}"
        set mirrorWindow to first window of mirrorApp
        set windowPosition to position of mirrorWindow
        set windowSize to size of mirrorWindow
        set frameText to "{{\"found\":true,\"x\":" & (item 1 of windowPosition) & ",\"y\":" & (item 2 of windowPosition) & ",\"width\":" & (item 1 of windowSize) & ",\"height\":" & (item 2 of windowSize)
        try
            set frameText to frameText & ",\"app\":" & my jsonText(name of mirrorApp) & ",\"bundle\":" & my jsonText(bundle identifier of mirrorApp)
        end try
        return frameText & "}}"
    on error errMsg
        return "{{\"found\":false,\"error\":" & my jsonText(errMsg) & "}}"
    end try
end tell
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MockScriptRunner, ScriptOutput};
    use mockall::predicate::*;

    fn locator(runner: MockScriptRunner) -> WindowLocator {
        WindowLocator::new(Arc::new(runner), DEFAULT_APP_NAME, DEFAULT_QUERY_TIMEOUT)
    }

    fn replying(output: LocateResult<ScriptOutput>) -> MockScriptRunner {
        let mut runner = MockScriptRunner::new();
        let mut output = Some(output);
        runner
            .expect_run()
            .with(always(), eq(DEFAULT_QUERY_TIMEOUT))
            .times(1)
            .returning(move |_, _| output.take().unwrap_or(Err(LocateError::UnsupportedPlatform)));
        runner
    }

    #[test]
    fn test_found_window_parses_frame_and_identity() {
        let runner = replying(Ok(ScriptOutput::ok(
            r#"{"found":true,"x":100,"y":40,"width":410,"height":892,"app":"iPhone Mirroring","bundle":"com.apple.ScreenContinuity"}"#,
        )));
        let frame = locator(runner).locate().unwrap();
        assert_eq!((frame.x, frame.y, frame.width, frame.height), (100, 40, 410, 892));
        assert_eq!(frame.app_name.as_deref(), Some("iPhone Mirroring"));
        assert_eq!(frame.bundle_id.as_deref(), Some("com.apple.ScreenContinuity"));
    }

    #[test]
    fn test_frame_without_identity_is_accepted() {
        let runner = replying(Ok(ScriptOutput::ok(
            r#"{"found":true,"x":-20,"y":0,"width":400,"height":900}"#,
        )));
        let frame = locator(runner).locate().unwrap();
        assert_eq!(frame.x, -20);
        assert_eq!(frame.app_name, None);
    }

    #[test]
    fn test_missing_app_is_not_found_with_details() {
        let runner = replying(Ok(ScriptOutput::ok(
            r#"{"found":false,"error":"Can't get application process 1"}"#,
        )));
        match locator(runner).locate() {
            Err(LocateError::NotFound { message, details }) => {
                assert_eq!(message, "iPhone Mirroring app not found or not active");
                assert_eq!(details.as_deref(), Some("Can't get application process 1"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_garbage_output_is_parse_failure() {
        let runner = replying(Ok(ScriptOutput::ok("window at 10,20")));
        match locator(runner).locate() {
            Err(LocateError::ParseFailure { raw_output }) => {
                assert_eq!(raw_output, "window at 10,20")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_found_without_size_is_parse_failure() {
        let runner = replying(Ok(ScriptOutput::ok(r#"{"found":true,"x":1,"y":2}"#)));
        assert!(matches!(
            locator(runner).locate(),
            Err(LocateError::ParseFailure { .. })
        ));
    }

    #[test]
    fn test_script_error_is_reported() {
        let runner = replying(Ok(ScriptOutput::failed("execution error: not allowed")));
        match locator(runner).locate() {
            Err(LocateError::ScriptFailed(stderr)) => {
                assert_eq!(stderr, "execution error: not allowed")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_timeout_is_distinguishable() {
        let runner = replying(Err(LocateError::Timeout { after_ms: 5000 }));
        let err = locator(runner).locate().unwrap_err();
        assert_eq!(err.to_string(), "Window query timed out after 5000ms");
    }

    #[test]
    fn test_query_script_targets_app_name() {
        let script = query_script(r#"My "Mirror""#);
        assert!(script.contains(r#"whose name contains "My \"Mirror\"""#));
        assert!(script.contains(r#"{\"found\":true"#));
    }
}
