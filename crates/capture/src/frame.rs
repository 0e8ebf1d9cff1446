//! Captured frame data structures

use bytes::Bytes;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use std::time::Instant;

use crate::{CaptureError, CaptureResult};

/// Pixel format of the captured frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// BGRA 8-bit per channel
    Bgra8,
    /// RGBA 8-bit per channel
    Rgba8,
}

/// Captured frame data
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// Raw pixel data
    pub data: Bytes,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Stride (bytes per row, may include padding)
    pub stride: u32,
    /// Pixel format
    pub format: PixelFormat,
    /// Capture timestamp
    pub timestamp: Instant,
}

impl CapturedFrame {
    /// Tightly packed RGBA frame
    pub fn from_rgba(width: u32, height: u32, data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            width,
            height,
            stride: width * 4,
            format: PixelFormat::Rgba8,
            timestamp: Instant::now(),
        }
    }

    /// Convert BGRA to RGBA in place, dropping any row padding
    pub fn bgra_to_rgba(&mut self) {
        if self.format != PixelFormat::Bgra8 {
            return;
        }

        let row_bytes = (self.width * 4) as usize;
        let data = Bytes::from(
            self.data
                .chunks(self.stride as usize)
                .take(self.height as usize)
                .flat_map(|row| row[..row_bytes.min(row.len())].chunks_exact(4))
                .flat_map(|px| [px[2], px[1], px[0], px[3]])
                .collect::<Vec<u8>>(),
        );

        self.data = data;
        self.stride = row_bytes as u32;
        self.format = PixelFormat::Rgba8;
    }

    /// Encode the frame as PNG
    pub fn to_png(&self) -> CaptureResult<Vec<u8>> {
        let mut frame = self.clone();
        frame.bgra_to_rgba();

        let expected = (frame.width as usize) * (frame.height as usize) * 4;
        if frame.stride != frame.width * 4 || frame.data.len() < expected {
            return Err(CaptureError::UnsupportedFormat(format!(
                "{} bytes for a {}x{} frame",
                frame.data.len(),
                frame.width,
                frame.height
            )));
        }

        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(
                &frame.data[..expected],
                frame.width,
                frame.height,
                ExtendedColorType::Rgba8,
            )
            .map_err(|e| CaptureError::Encode(e.to_string()))?;
        Ok(png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgra_to_rgba_swaps_channels_and_drops_padding() {
        // 1x2 frame, 8 byte stride: one pixel plus 4 bytes of padding per row
        let mut frame = CapturedFrame {
            data: Bytes::from(vec![1, 2, 3, 4, 0, 0, 0, 0, 5, 6, 7, 8, 0, 0, 0, 0]),
            width: 1,
            height: 2,
            stride: 8,
            format: PixelFormat::Bgra8,
            timestamp: Instant::now(),
        };
        frame.bgra_to_rgba();
        assert_eq!(frame.format, PixelFormat::Rgba8);
        assert_eq!(frame.stride, 4);
        assert_eq!(&frame.data[..], &[3, 2, 1, 4, 7, 6, 5, 8]);
    }

    #[test]
    fn test_png_has_signature() {
        let frame = CapturedFrame::from_rgba(2, 2, vec![255u8; 16]);
        let png = frame.to_png().unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let frame = CapturedFrame::from_rgba(4, 4, vec![0u8; 8]);
        assert!(matches!(frame.to_png(), Err(CaptureError::UnsupportedFormat(_))));
    }
}
