//! Screen Capture - display size queries and still snapshots
//!
//! macOS uses Core Graphics display images. Other platforms have no backend.

mod error;
mod frame;
mod traits;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use std::sync::Arc;

pub use error::*;
pub use frame::*;
pub use traits::*;

#[cfg(target_os = "macos")]
pub use macos::MacOSCapture;

#[cfg(target_os = "macos")]
pub fn has_screen_recording_permission() -> bool {
    core_graphics::access::ScreenCaptureAccess::default().preflight()
}

#[cfg(target_os = "macos")]
pub fn request_screen_recording_permission() -> bool {
    core_graphics::access::ScreenCaptureAccess::default().request()
}

#[cfg(not(target_os = "macos"))]
pub fn has_screen_recording_permission() -> bool {
    true
}

#[cfg(not(target_os = "macos"))]
pub fn request_screen_recording_permission() -> bool {
    true
}

/// Create a platform-appropriate screen capture instance
pub fn create_capture() -> CaptureResult<Arc<dyn ScreenCapture>> {
    #[cfg(target_os = "macos")]
    {
        Ok(Arc::new(MacOSCapture::new()?))
    }

    #[cfg(not(target_os = "macos"))]
    {
        Err(CaptureError::UnsupportedPlatform)
    }
}
