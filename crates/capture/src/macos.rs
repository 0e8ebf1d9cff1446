//! macOS screen capture using CGDisplay snapshots

use core_graphics::display::CGDisplay;
use core_graphics::geometry::{CGPoint, CGRect, CGSize};
use core_graphics::image::CGImage;
use shared_protocol::Rect;
use std::time::Instant;
use tracing::{debug, info};

use crate::{CaptureError, CaptureResult, CapturedFrame, PixelFormat, ScreenCapture};

/// macOS screen capture implementation
pub struct MacOSCapture {
    display: CGDisplay,
}

impl MacOSCapture {
    /// Create a capture source for the main display
    pub fn new() -> CaptureResult<Self> {
        info!("Initializing macOS screen capture");
        let display = CGDisplay::main();
        if display.pixels_wide() == 0 {
            return Err(CaptureError::NoDisplays);
        }
        Ok(Self { display })
    }

    fn frame_from_image(image: CGImage) -> CaptureResult<CapturedFrame> {
        if image.bits_per_pixel() != 32 {
            return Err(CaptureError::UnsupportedFormat(format!(
                "{} bits per pixel",
                image.bits_per_pixel()
            )));
        }

        let data = image.data();
        Ok(CapturedFrame {
            data: bytes::Bytes::copy_from_slice(data.bytes()),
            width: image.width() as u32,
            height: image.height() as u32,
            stride: image.bytes_per_row() as u32,
            format: PixelFormat::Bgra8,
            timestamp: Instant::now(),
        })
    }
}

impl ScreenCapture for MacOSCapture {
    fn capture(&self, region: Option<Rect>) -> CaptureResult<CapturedFrame> {
        let image = match region {
            Some(rect) => {
                if rect.width <= 0 || rect.height <= 0 {
                    return Err(CaptureError::InvalidRegion {
                        width: rect.width,
                        height: rect.height,
                    });
                }
                let bounds = CGRect::new(
                    &CGPoint::new(rect.x as f64, rect.y as f64),
                    &CGSize::new(rect.width as f64, rect.height as f64),
                );
                self.display.image_for_rect(bounds)
            }
            None => self.display.image(),
        }
        .ok_or(CaptureError::PermissionDenied)?;

        let frame = Self::frame_from_image(image)?;
        debug!(
            region = ?region,
            "Captured {}x{} frame",
            frame.width, frame.height
        );
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macos_capture_creation() {
        let capture = MacOSCapture::new().unwrap();
        let frame = capture.capture(Some(Rect::new(0, 0, 16, 16))).unwrap();
        assert!(frame.width >= 16 && frame.height >= 16);
    }
}
