//! Synthetic capture source for tests

use parking_lot::Mutex;
use shared_protocol::Rect;

use crate::{CaptureError, CaptureResult, CapturedFrame, ScreenCapture};

/// Returns solid frames sized to the requested region and records each request
pub struct MockCapture {
    display: (u32, u32),
    requests: Mutex<Vec<Option<Rect>>>,
    failing: bool,
}

impl Default for MockCapture {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

impl MockCapture {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            display: (width, height),
            requests: Mutex::new(Vec::new()),
            failing: false,
        }
    }

    /// Every capture fails
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn requests(&self) -> Vec<Option<Rect>> {
        self.requests.lock().clone()
    }
}

impl ScreenCapture for MockCapture {
    fn capture(&self, region: Option<Rect>) -> CaptureResult<CapturedFrame> {
        if self.failing {
            return Err(CaptureError::CaptureFailed("mock failure".into()));
        }
        self.requests.lock().push(region);

        let (width, height) = match region {
            Some(rect) if rect.width <= 0 || rect.height <= 0 => {
                return Err(CaptureError::InvalidRegion {
                    width: rect.width,
                    height: rect.height,
                });
            }
            Some(rect) => (rect.width as u32, rect.height as u32),
            None => self.display,
        };
        let pixels = vec![0x80u8; (width * height * 4) as usize];
        Ok(CapturedFrame::from_rgba(width, height, pixels))
    }
}
