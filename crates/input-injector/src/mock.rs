//! Recording injector for tests.
//!
//! Every call is appended to an in-memory log with the instant it happened so
//! tests can assert on order and pacing. Failures can be scripted per call kind.

use std::collections::HashSet;
use std::time::Instant;

use parking_lot::Mutex;
use shared_protocol::{MouseButton, VirtualKeyCode};

use crate::{InjectorError, InjectorResult, InputInjector};

/// One call observed by [`RecordingInjector`]
#[derive(Debug, Clone, PartialEq)]
pub enum Injected {
    Move { x: f64, y: f64 },
    Drag { x: f64, y: f64 },
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    KeyDown(VirtualKeyCode),
    KeyUp(VirtualKeyCode),
    Char(char),
    ScrollVertical(i32),
    ScrollHorizontal(i32),
}

pub struct RecordingInjector {
    log: Mutex<Vec<(Instant, Injected)>>,
    position: Mutex<(f64, f64)>,
    screen: (u32, u32),
    horizontal_scroll: bool,
    failing_chars: HashSet<char>,
    fail_everything: bool,
}

impl Default for RecordingInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingInjector {
    /// 1920x1080 display with horizontal scrolling available
    pub fn new() -> Self {
        Self {
            log: Mutex::new(Vec::new()),
            position: Mutex::new((0.0, 0.0)),
            screen: (1920, 1080),
            horizontal_scroll: true,
            failing_chars: HashSet::new(),
            fail_everything: false,
        }
    }

    pub fn with_screen(mut self, width: u32, height: u32) -> Self {
        self.screen = (width, height);
        self
    }

    pub fn without_horizontal_scroll(mut self) -> Self {
        self.horizontal_scroll = false;
        self
    }

    /// `write_char` fails for these characters
    pub fn failing_on(mut self, chars: &str) -> Self {
        self.failing_chars.extend(chars.chars());
        self
    }

    /// Every call fails with a platform error
    pub fn failing(mut self) -> Self {
        self.fail_everything = true;
        self
    }

    pub fn events(&self) -> Vec<Injected> {
        self.log.lock().iter().map(|(_, e)| e.clone()).collect()
    }

    pub fn timed_events(&self) -> Vec<(Instant, Injected)> {
        self.log.lock().clone()
    }

    pub fn clear(&self) {
        self.log.lock().clear();
    }

    fn record(&self, event: Injected) -> InjectorResult<()> {
        if self.fail_everything {
            return Err(InjectorError::Platform("mock failure".into()));
        }
        self.log.lock().push((Instant::now(), event));
        Ok(())
    }
}

impl InputInjector for RecordingInjector {
    fn has_permission(&self) -> bool {
        true
    }

    fn move_mouse(&self, x: f64, y: f64) -> InjectorResult<()> {
        self.record(Injected::Move { x, y })?;
        *self.position.lock() = (x, y);
        Ok(())
    }

    fn drag_mouse(&self, x: f64, y: f64, _button: MouseButton) -> InjectorResult<()> {
        self.record(Injected::Drag { x, y })?;
        *self.position.lock() = (x, y);
        Ok(())
    }

    fn mouse_down(&self, button: MouseButton) -> InjectorResult<()> {
        self.record(Injected::MouseDown(button))
    }

    fn mouse_up(&self, button: MouseButton) -> InjectorResult<()> {
        self.record(Injected::MouseUp(button))
    }

    fn key_down(&self, key: VirtualKeyCode) -> InjectorResult<()> {
        self.record(Injected::KeyDown(key))
    }

    fn key_up(&self, key: VirtualKeyCode) -> InjectorResult<()> {
        self.record(Injected::KeyUp(key))
    }

    fn write_char(&self, ch: char) -> InjectorResult<()> {
        if self.failing_chars.contains(&ch) {
            return Err(InjectorError::InjectionFailed(format!("cannot type {ch:?}")));
        }
        self.record(Injected::Char(ch))
    }

    fn scroll_vertical(&self, amount: i32) -> InjectorResult<()> {
        self.record(Injected::ScrollVertical(amount))
    }

    fn scroll_horizontal(&self, amount: i32) -> InjectorResult<()> {
        if !self.horizontal_scroll {
            return Err(InjectorError::Unsupported(
                "Horizontal scrolling not supported on this platform".to_string(),
            ));
        }
        self.record(Injected::ScrollHorizontal(amount))
    }

    fn supports_horizontal_scroll(&self) -> bool {
        self.horizontal_scroll
    }

    fn mouse_position(&self) -> InjectorResult<(f64, f64)> {
        Ok(*self.position.lock())
    }

    fn screen_size(&self) -> InjectorResult<(u32, u32)> {
        if self.fail_everything {
            return Err(InjectorError::Platform("mock failure".into()));
        }
        Ok(self.screen)
    }
}
