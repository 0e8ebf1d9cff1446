//! Input Injector - OS-level mouse and keyboard synthesis
//!
//! Drives the host pointer and keyboard on behalf of the control server.

mod error;
mod traits;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

use std::sync::Arc;

pub use error::*;
pub use traits::*;

#[cfg(target_os = "macos")]
pub use macos::MacOSInputInjector;

/// Create a platform-appropriate input injector
pub fn create_injector() -> InjectorResult<Arc<dyn InputInjector>> {
    #[cfg(target_os = "macos")]
    {
        Ok(Arc::new(MacOSInputInjector::new()?))
    }

    #[cfg(not(target_os = "macos"))]
    {
        Err(InjectorError::UnsupportedPlatform)
    }
}

/// Ask the OS for accessibility permission, prompting the user when possible
pub fn request_permission() -> bool {
    #[cfg(target_os = "macos")]
    {
        MacOSInputInjector.request_permission()
    }

    #[cfg(not(target_os = "macos"))]
    {
        false
    }
}
