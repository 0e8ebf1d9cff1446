//! Mirror window geometry: locate the device content inside the window chrome

use shared_protocol::{MappingConfig, Rect, WindowFrame};
use tracing::{debug, info};

use crate::{DeviceProfile, MappingError, MappingResult, nearest_profile};

/// Smallest content area accepted as a device screen
pub const MIN_CONTENT_WIDTH: i32 = 200;
pub const MIN_CONTENT_HEIGHT: i32 = 400;

/// Chrome subtracted from a mirror window to reach the device content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingTier {
    pub title_bar: i32,
    /// Total horizontal padding, split evenly left and right
    pub horizontal: i32,
    /// Total vertical padding below the title bar, split evenly top and bottom
    pub vertical: i32,
}

impl PaddingTier {
    pub const MINIMAL: PaddingTier = PaddingTier {
        title_bar: 28,
        horizontal: 20,
        vertical: 20,
    };
    pub const MODERATE: PaddingTier = PaddingTier {
        title_bar: 28,
        horizontal: 40,
        vertical: 50,
    };
    pub const GENEROUS: PaddingTier = PaddingTier {
        title_bar: 28,
        horizontal: 80,
        vertical: 100,
    };

    /// 10px margins, used when the tiered padding leaves too little content
    pub const FALLBACK: PaddingTier = PaddingTier::MINIMAL;

    /// Tier for a window of the given size
    pub fn for_window(width: i32, height: i32) -> Self {
        if width < 500 && height < 1000 {
            Self::MINIMAL
        } else if width < 800 && height < 1400 {
            Self::MODERATE
        } else {
            Self::GENEROUS
        }
    }

    /// Content rectangle of `window` once this padding is removed
    pub fn content_rect(&self, window: Rect) -> Rect {
        Rect::new(
            window.x + self.horizontal / 2,
            window.y + self.title_bar + self.vertical / 2,
            window.width - self.horizontal,
            window.height - self.title_bar - self.vertical,
        )
    }
}

fn is_viable(content: &Rect) -> bool {
    content.width >= MIN_CONTENT_WIDTH && content.height >= MIN_CONTENT_HEIGHT
}

/// Result of inferring device geometry from a mirror window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inference {
    pub content: Rect,
    pub profile: &'static DeviceProfile,
    pub aspect_ratio: f64,
}

impl Inference {
    /// Mapping configuration that routes logical points into `content`
    pub fn mapping(&self) -> MappingConfig {
        MappingConfig {
            enabled: true,
            mirror_x: self.content.x,
            mirror_y: self.content.y,
            mirror_width: self.content.width,
            mirror_height: self.content.height,
            aspect_ratio: self.aspect_ratio,
            logical_width: self.profile.logical_width,
            logical_height: self.profile.logical_height,
        }
    }
}

/// Match a mirror content rectangle to the closest known device
pub fn infer_from_content(content: Rect) -> MappingResult<Inference> {
    if content.width <= 0 || content.height <= 0 {
        return Err(MappingError::InvalidMirror {
            width: content.width,
            height: content.height,
        });
    }

    let aspect_ratio = content.height as f64 / content.width as f64;
    let profile = nearest_profile(aspect_ratio);

    info!(
        device = profile.name,
        logical = ?(profile.logical_width, profile.logical_height),
        mirror = ?(content.width, content.height),
        origin = ?(content.x, content.y),
        "Aspect ratio {:.3} matched device profile",
        aspect_ratio
    );

    Ok(Inference {
        content,
        profile,
        aspect_ratio,
    })
}

/// Find the device content inside a mirror window and match it to a device.
///
/// Padding is chosen by window size tier; if the result is below
/// [`MIN_CONTENT_WIDTH`]x[`MIN_CONTENT_HEIGHT`] the fallback margins are tried
/// before giving up with [`MappingError::WindowTooSmall`].
pub fn infer(window: &WindowFrame) -> MappingResult<Inference> {
    let frame = window.rect();
    let tier = PaddingTier::for_window(frame.width, frame.height);
    let mut content = tier.content_rect(frame);

    if !is_viable(&content) {
        debug!(
            "Tiered padding left {}x{}, retrying with fallback margins",
            content.width, content.height
        );
        content = PaddingTier::FALLBACK.content_rect(frame);

        if !is_viable(&content) {
            return Err(MappingError::WindowTooSmall {
                window: (frame.width, frame.height),
                content: (content.width, content.height),
            });
        }
    }

    infer_from_content(content)
}
