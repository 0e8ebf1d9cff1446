//! Geometry shared between detection, mapping and the wire

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in host display points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Inclusive on all four edges, so a point on the right or bottom border counts
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.x <= x && x <= self.right() && self.y <= y && y <= self.bottom()
    }

    /// `[x, y, width, height]`, the shape clients expect for region echoes
    pub fn to_array(&self) -> [i32; 4] {
        [self.x, self.y, self.width, self.height]
    }
}

/// On-screen frame of the mirrored-device application window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowFrame {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub app_name: Option<String>,
    pub bundle_id: Option<String>,
}

impl WindowFrame {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Logical size assumed before any configure or detect
pub const DEFAULT_LOGICAL_SIZE: (i32, i32) = (393, 852);

/// Aspect ratio (height / width) assumed before any configure or detect
pub const DEFAULT_ASPECT_RATIO: f64 = 2.17;

/// The process-wide logical-to-host coordinate transform.
///
/// Always handled as a whole value: readers copy it once, writers replace it
/// entirely.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MappingConfig {
    pub enabled: bool,
    pub mirror_x: i32,
    pub mirror_y: i32,
    pub mirror_width: i32,
    pub mirror_height: i32,
    /// Height / width of the mirror content area
    pub aspect_ratio: f64,
    pub logical_width: i32,
    pub logical_height: i32,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            mirror_x: 0,
            mirror_y: 0,
            mirror_width: 0,
            mirror_height: 0,
            aspect_ratio: DEFAULT_ASPECT_RATIO,
            logical_width: DEFAULT_LOGICAL_SIZE.0,
            logical_height: DEFAULT_LOGICAL_SIZE.1,
        }
    }
}

impl MappingConfig {
    /// Host-space rectangle occupied by the mirrored device content
    pub fn mirror_rect(&self) -> Rect {
        Rect::new(
            self.mirror_x,
            self.mirror_y,
            self.mirror_width,
            self.mirror_height,
        )
    }

    /// Center of the logical device, or `None` when mapping is disabled
    pub fn logical_center(&self) -> Option<(i32, i32)> {
        self.enabled
            .then(|| (self.logical_width / 2, self.logical_height / 2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_is_inclusive() {
        let rect = Rect::new(100, 50, 390, 844);
        assert!(rect.contains(100, 50));
        assert!(rect.contains(490, 894));
        assert!(!rect.contains(491, 894));
        assert!(!rect.contains(99, 60));
    }

    #[test]
    fn test_default_mapping_is_disabled() {
        let config = MappingConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.logical_center(), None);
        assert_eq!((config.logical_width, config.logical_height), (393, 852));
    }
}
