//! Catalog of known device logical resolutions

/// A known mobile device screen in logical points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceProfile {
    pub name: &'static str,
    pub logical_width: i32,
    pub logical_height: i32,
}

impl DeviceProfile {
    /// Height / width
    pub fn aspect_ratio(&self) -> f64 {
        self.logical_height as f64 / self.logical_width as f64
    }
}

/// Known phones and tablets.
///
/// Order matters: nearest-aspect lookup keeps the first of equally close entries.
pub const DEVICE_CATALOG: &[DeviceProfile] = &[
    DeviceProfile {
        name: "iPhone 15 Pro",
        logical_width: 393,
        logical_height: 852,
    },
    DeviceProfile {
        name: "iPhone 15 Plus",
        logical_width: 428,
        logical_height: 926,
    },
    DeviceProfile {
        name: "iPhone 12/13/14",
        logical_width: 390,
        logical_height: 844,
    },
    DeviceProfile {
        name: "iPhone 11 Pro Max",
        logical_width: 414,
        logical_height: 896,
    },
    DeviceProfile {
        name: "iPhone X/XS",
        logical_width: 375,
        logical_height: 812,
    },
    DeviceProfile {
        name: "iPad Pro 12.9",
        logical_width: 1024,
        logical_height: 1366,
    },
    DeviceProfile {
        name: "iPad Pro 11",
        logical_width: 834,
        logical_height: 1194,
    },
];

/// Catalog entry whose aspect ratio is closest to `aspect_ratio`.
///
/// Only the ratio is compared, never the magnitude. There is no distance
/// threshold: any shape maps to some device. Ties go to the earliest entry.
pub fn nearest_profile(aspect_ratio: f64) -> &'static DeviceProfile {
    let distance = |p: &DeviceProfile| (p.aspect_ratio() - aspect_ratio).abs();

    // min_by keeps the first of equal elements
    DEVICE_CATALOG
        .iter()
        .min_by(|a, b| distance(a).total_cmp(&distance(b)))
        .unwrap_or(&DEVICE_CATALOG[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_ratio_selects_matching_entry() {
        for _ in 0..3 {
            let profile = nearest_profile(844.0 / 390.0);
            assert_eq!(profile.name, "iPhone 12/13/14");
        }
    }

    #[test]
    fn test_every_catalog_entry_selects_itself() {
        for entry in DEVICE_CATALOG {
            assert_eq!(nearest_profile(entry.aspect_ratio()), entry);
        }
    }

    #[test]
    fn test_tablet_ratio_selects_ipad() {
        let profile = nearest_profile(1.34);
        assert_eq!(profile.name, "iPad Pro 12.9");
        let profile = nearest_profile(1.43);
        assert_eq!(profile.name, "iPad Pro 11");
    }

    #[test]
    fn test_absurd_shape_still_maps_to_some_device() {
        assert_eq!(nearest_profile(10.0).name, "iPhone 15 Pro");
        assert_eq!(nearest_profile(0.1).name, "iPad Pro 12.9");
    }
}
