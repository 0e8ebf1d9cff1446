//! Logical device coordinates to host display coordinates

use parking_lot::RwLock;
use shared_protocol::MappingConfig;
use tracing::debug;

/// Owner of the live [`MappingConfig`].
///
/// Readers take a [`snapshot`](Self::snapshot) once per action and compute
/// everything from that copy; writers swap the whole value under the lock.
#[derive(Debug, Default)]
pub struct MappingHandle {
    config: RwLock<MappingConfig>,
}

impl MappingHandle {
    /// Handle starting in the disabled (identity) state
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current configuration
    pub fn snapshot(&self) -> MappingConfig {
        *self.config.read()
    }

    /// Replace the configuration, returning the previous one
    pub fn replace(&self, config: MappingConfig) -> MappingConfig {
        let previous = std::mem::replace(&mut *self.config.write(), config);
        debug!(?previous, current = ?config, "Mapping configuration replaced");
        previous
    }
}

/// Coordinate transform over a configuration snapshot
pub trait HostTransform {
    /// Map a logical device point to host display coordinates.
    ///
    /// Identity when mapping is disabled. X and Y scale independently and the
    /// result is truncated toward zero.
    fn to_host(&self, x: i32, y: i32) -> (i32, i32);

    /// Whether a host point lies inside the mirror rectangle, `None` when disabled
    fn host_in_mirror(&self, host_x: i32, host_y: i32) -> Option<bool>;
}

impl HostTransform for MappingConfig {
    fn to_host(&self, x: i32, y: i32) -> (i32, i32) {
        if !self.enabled || self.logical_width <= 0 || self.logical_height <= 0 {
            return (x, y);
        }

        let scale_x = self.mirror_width as f64 / self.logical_width as f64;
        let scale_y = self.mirror_height as f64 / self.logical_height as f64;

        let host_x = self.mirror_x as f64 + x as f64 * scale_x;
        let host_y = self.mirror_y as f64 + y as f64 * scale_y;

        (host_x as i32, host_y as i32)
    }

    fn host_in_mirror(&self, host_x: i32, host_y: i32) -> Option<bool> {
        self.enabled
            .then(|| self.mirror_rect().contains(host_x, host_y))
    }
}
