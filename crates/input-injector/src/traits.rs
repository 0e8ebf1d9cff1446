//! Input injector trait abstraction

use std::thread;
use std::time::Duration;

use shared_protocol::{MouseButton, VirtualKeyCode};

use crate::{InjectorError, InjectorResult};

/// Interval between intermediate cursor positions during timed moves and drags
pub const MOTION_STEP: Duration = Duration::from_millis(10);

/// Input injector trait.
///
/// All coordinates are host display points. Calls block until the OS has
/// accepted the event; timed helpers block for their whole duration.
pub trait InputInjector: Send + Sync {
    /// Check if we have permission to inject input
    fn has_permission(&self) -> bool;

    /// Move mouse to absolute position
    fn move_mouse(&self, x: f64, y: f64) -> InjectorResult<()>;

    /// Move mouse while the given button is held
    fn drag_mouse(&self, x: f64, y: f64, button: MouseButton) -> InjectorResult<()>;

    /// Press and hold mouse button at the current position
    fn mouse_down(&self, button: MouseButton) -> InjectorResult<()>;

    /// Release mouse button at the current position
    fn mouse_up(&self, button: MouseButton) -> InjectorResult<()>;

    /// Press and hold a key
    fn key_down(&self, key: VirtualKeyCode) -> InjectorResult<()>;

    /// Release a key
    fn key_up(&self, key: VirtualKeyCode) -> InjectorResult<()>;

    /// Type one character as text, without synthesizing modifier presses
    fn write_char(&self, ch: char) -> InjectorResult<()>;

    /// Scroll the wheel vertically by `amount` units; positive scrolls up
    fn scroll_vertical(&self, amount: i32) -> InjectorResult<()>;

    /// Scroll horizontally by `amount` units; positive scrolls left
    fn scroll_horizontal(&self, _amount: i32) -> InjectorResult<()> {
        Err(InjectorError::Unsupported(
            "Horizontal scrolling not supported on this platform".to_string(),
        ))
    }

    /// Whether [`scroll_horizontal`](Self::scroll_horizontal) is implemented
    fn supports_horizontal_scroll(&self) -> bool {
        false
    }

    /// Get current mouse position
    fn mouse_position(&self) -> InjectorResult<(f64, f64)>;

    /// Get screen dimensions in display points
    fn screen_size(&self) -> InjectorResult<(u32, u32)>;

    /// Move to a point and click there
    fn click_at(&self, x: f64, y: f64, button: MouseButton) -> InjectorResult<()> {
        self.move_mouse(x, y)?;
        self.mouse_down(button)?;
        self.mouse_up(button)
    }

    /// Move the cursor to a point over `duration`, in [`MOTION_STEP`] increments
    fn move_smoothly(&self, x: f64, y: f64, duration: Duration) -> InjectorResult<()> {
        let (from_x, from_y) = self.mouse_position()?;
        for (px, py) in interpolate((from_x, from_y), (x, y), duration) {
            self.move_mouse(px, py)?;
            thread::sleep(MOTION_STEP);
        }
        self.move_mouse(x, y)
    }

    /// Drag from the current position to a point over `duration`.
    ///
    /// The button is released even when an intermediate drag event fails.
    fn drag_to(
        &self,
        x: f64,
        y: f64,
        duration: Duration,
        button: MouseButton,
    ) -> InjectorResult<()> {
        let (from_x, from_y) = self.mouse_position()?;
        self.mouse_down(button)?;

        let motion = interpolate((from_x, from_y), (x, y), duration)
            .try_for_each(|(px, py)| {
                self.drag_mouse(px, py, button)?;
                thread::sleep(MOTION_STEP);
                Ok(())
            })
            .and_then(|_| self.drag_mouse(x, y, button));

        let release = self.mouse_up(button);
        motion.and(release)
    }

    /// Press and release a key
    fn tap_key(&self, key: VirtualKeyCode) -> InjectorResult<()> {
        self.key_down(key)?;
        self.key_up(key)
    }

    /// Hold `keys` down in order, then release them in reverse order
    fn hotkey(&self, keys: &[VirtualKeyCode]) -> InjectorResult<()> {
        let mut pressed = Vec::with_capacity(keys.len());
        let mut result = Ok(());
        for &key in keys {
            if let Err(e) = self.key_down(key) {
                result = Err(e);
                break;
            }
            pressed.push(key);
        }

        for &key in pressed.iter().rev() {
            let released = self.key_up(key);
            if result.is_ok() {
                result = released;
            }
        }
        result
    }
}

/// Intermediate points strictly between `from` and `to`, one per [`MOTION_STEP`]
fn interpolate(
    from: (f64, f64),
    to: (f64, f64),
    duration: Duration,
) -> impl Iterator<Item = (f64, f64)> {
    let steps = (duration.as_millis() / MOTION_STEP.as_millis()) as u64;
    (1..steps).map(move |i| {
        let t = i as f64 / steps as f64;
        (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_excludes_endpoints() {
        let points: Vec<_> =
            interpolate((0.0, 0.0), (100.0, 50.0), Duration::from_millis(50)).collect();
        assert_eq!(points.len(), 4);
        assert_eq!(points[0], (20.0, 10.0));
        assert_eq!(points[3], (80.0, 40.0));
    }

    #[test]
    fn test_interpolate_zero_duration_is_empty() {
        assert_eq!(
            interpolate((0.0, 0.0), (10.0, 10.0), Duration::ZERO).count(),
            0
        );
    }

    #[test]
    fn test_interpolate_long_duration_is_lazy() {
        let mut points = interpolate((0.0, 0.0), (1.0, 1.0), Duration::from_secs(1_000_000_000));
        assert_eq!(points.size_hint().0, 99_999_999_999);
        assert!(points.next().is_some());
    }
}
