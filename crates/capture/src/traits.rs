//! Screen capture trait abstraction

use shared_protocol::Rect;

use crate::{CaptureResult, CapturedFrame};

/// Screen capture trait
pub trait ScreenCapture: Send + Sync {
    /// Capture a rectangle of the main display, or all of it when `region` is `None`.
    ///
    /// Blocking. The frame may be larger than the region on HiDPI displays.
    fn capture(&self, region: Option<Rect>) -> CaptureResult<CapturedFrame>;
}
