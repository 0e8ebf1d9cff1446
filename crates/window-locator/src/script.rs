//! OS scripting channel

use std::io::{self, Read};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};
use wait_timeout::ChildExt;

use crate::{LocateError, LocateResult};

/// Captured result of one script run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScriptOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ScriptOutput {
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Runs one automation script and reports what it printed.
///
/// A script that ran but exited non-zero is `Ok` with `success == false`;
/// `Err` means the script could not be run to completion at all.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait ScriptRunner: Send + Sync {
    fn run(&self, script: &str, timeout: Duration) -> LocateResult<ScriptOutput>;
}

/// [`ScriptRunner`] backed by `osascript -e`
#[derive(Debug, Default, Clone, Copy)]
pub struct OsaScriptRunner;

impl ScriptRunner for OsaScriptRunner {
    fn run(&self, script: &str, timeout: Duration) -> LocateResult<ScriptOutput> {
        if !cfg!(target_os = "macos") {
            return Err(LocateError::UnsupportedPlatform);
        }

        let mut command = Command::new("osascript");
        command.arg("-e").arg(script);
        run_with_timeout(command, timeout)
    }
}

/// Run `command` to completion or kill it once `timeout` elapses.
///
/// Both pipes are drained on their own threads while waiting, so a chatty
/// child never stalls on a full pipe buffer.
fn run_with_timeout(mut command: Command, timeout: Duration) -> LocateResult<ScriptOutput> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match child.wait_timeout(timeout) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            warn!("Script timed out after {}ms", timeout.as_millis());
            return Err(LocateError::Timeout {
                after_ms: timeout.as_millis() as u64,
            });
        }
        Err(err) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(err.into());
        }
    };

    let stdout = collect(stdout)?;
    let stderr = collect(stderr)?;

    debug!(code = ?status.code(), "Script finished");
    Ok(ScriptOutput {
        success: status.success(),
        stdout: stdout.trim().to_string(),
        stderr: stderr.trim().to_string(),
    })
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<String>> {
    thread::spawn(move || {
        let mut text = String::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_string(&mut text)?;
        }
        Ok(text)
    })
}

fn collect(reader: JoinHandle<io::Result<String>>) -> LocateResult<String> {
    reader
        .join()
        .map_err(|_| LocateError::ScriptFailed("pipe reader panicked".to_string()))?
        .map_err(LocateError::from)
}

/// Quote `text` for use inside an AppleScript string literal
pub fn escape_applescript(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
