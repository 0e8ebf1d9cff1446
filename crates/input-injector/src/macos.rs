//! macOS input injection using CGEvent

use core_foundation::base::TCFType;
use core_foundation::boolean::CFBoolean;
use core_foundation::dictionary::CFDictionary;
use core_foundation::string::CFString;
use core_graphics::display::{CGDisplay, CGPoint};
use core_graphics::event::{
    CGEvent, CGEventTapLocation, CGEventType, CGKeyCode, CGMouseButton, ScrollEventUnit,
};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use shared_protocol::{MouseButton, VirtualKeyCode};
use tracing::{debug, info};

use crate::{InjectorError, InjectorResult, InputInjector};

/// macOS input injector using Core Graphics events
pub struct MacOSInputInjector;

impl MacOSInputInjector {
    /// Create a new macOS input injector
    pub fn new() -> InjectorResult<Self> {
        info!("Initializing macOS input injector");
        Ok(Self)
    }

    /// Prompt for accessibility permission if it has not been granted yet
    pub fn request_permission(&self) -> bool {
        info!("Requesting accessibility permission");
        let prompt_key = CFString::new("kAXTrustedCheckOptionPrompt");
        let prompt_value = CFBoolean::true_value();
        let options = CFDictionary::from_CFType_pairs(&[(prompt_key, prompt_value)]);

        unsafe { AXIsProcessTrustedWithOptions(options.as_concrete_TypeRef()) }
    }

    fn source() -> InjectorResult<CGEventSource> {
        CGEventSource::new(CGEventSourceStateID::HIDSystemState)
            .map_err(|_| InjectorError::Platform("Failed to create event source".into()))
    }

    fn post_mouse(
        &self,
        event_type: CGEventType,
        x: f64,
        y: f64,
        button: CGMouseButton,
    ) -> InjectorResult<()> {
        let point = CGPoint::new(x, y);
        let event = CGEvent::new_mouse_event(Self::source()?, event_type, point, button)
            .map_err(|_| InjectorError::Platform("Failed to create mouse event".into()))?;
        event.post(CGEventTapLocation::HID);
        Ok(())
    }

    fn post_key(&self, keycode: CGKeyCode, down: bool) -> InjectorResult<()> {
        let event = CGEvent::new_keyboard_event(Self::source()?, keycode, down)
            .map_err(|_| InjectorError::Platform("Failed to create keyboard event".into()))?;
        event.post(CGEventTapLocation::HID);
        Ok(())
    }

    fn post_scroll(&self, vertical: i32, horizontal: i32) -> InjectorResult<()> {
        let event = CGEvent::new_scroll_event(
            Self::source()?,
            ScrollEventUnit::LINE,
            2,
            vertical,
            horizontal,
            0,
        )
        .map_err(|_| InjectorError::Platform("Failed to create scroll event".into()))?;
        event.post(CGEventTapLocation::HID);
        Ok(())
    }

    fn cg_button(button: MouseButton) -> CGMouseButton {
        match button {
            MouseButton::Left => CGMouseButton::Left,
            MouseButton::Right => CGMouseButton::Right,
            MouseButton::Middle => CGMouseButton::Center,
        }
    }

    /// Convert our virtual key code to macOS key code
    fn to_macos_keycode(key: VirtualKeyCode) -> CGKeyCode {
        match key {
            VirtualKeyCode::A => 0x00,
            VirtualKeyCode::S => 0x01,
            VirtualKeyCode::D => 0x02,
            VirtualKeyCode::F => 0x03,
            VirtualKeyCode::H => 0x04,
            VirtualKeyCode::G => 0x05,
            VirtualKeyCode::Z => 0x06,
            VirtualKeyCode::X => 0x07,
            VirtualKeyCode::C => 0x08,
            VirtualKeyCode::V => 0x09,
            VirtualKeyCode::B => 0x0B,
            VirtualKeyCode::Q => 0x0C,
            VirtualKeyCode::W => 0x0D,
            VirtualKeyCode::E => 0x0E,
            VirtualKeyCode::R => 0x0F,
            VirtualKeyCode::Y => 0x10,
            VirtualKeyCode::T => 0x11,
            VirtualKeyCode::Num1 => 0x12,
            VirtualKeyCode::Num2 => 0x13,
            VirtualKeyCode::Num3 => 0x14,
            VirtualKeyCode::Num4 => 0x15,
            VirtualKeyCode::Num6 => 0x16,
            VirtualKeyCode::Num5 => 0x17,
            VirtualKeyCode::Equal => 0x18,
            VirtualKeyCode::Num9 => 0x19,
            VirtualKeyCode::Num7 => 0x1A,
            VirtualKeyCode::Minus => 0x1B,
            VirtualKeyCode::Num8 => 0x1C,
            VirtualKeyCode::Num0 => 0x1D,
            VirtualKeyCode::RightBracket => 0x1E,
            VirtualKeyCode::O => 0x1F,
            VirtualKeyCode::U => 0x20,
            VirtualKeyCode::LeftBracket => 0x21,
            VirtualKeyCode::I => 0x22,
            VirtualKeyCode::P => 0x23,
            VirtualKeyCode::Enter => 0x24,
            VirtualKeyCode::L => 0x25,
            VirtualKeyCode::J => 0x26,
            VirtualKeyCode::Quote => 0x27,
            VirtualKeyCode::K => 0x28,
            VirtualKeyCode::Semicolon => 0x29,
            VirtualKeyCode::Backslash => 0x2A,
            VirtualKeyCode::Comma => 0x2B,
            VirtualKeyCode::Slash => 0x2C,
            VirtualKeyCode::N => 0x2D,
            VirtualKeyCode::M => 0x2E,
            VirtualKeyCode::Period => 0x2F,
            VirtualKeyCode::Tab => 0x30,
            VirtualKeyCode::Space => 0x31,
            VirtualKeyCode::Grave => 0x32,
            VirtualKeyCode::Backspace => 0x33,
            VirtualKeyCode::Escape => 0x35,
            VirtualKeyCode::Meta => 0x37,
            VirtualKeyCode::Shift => 0x38,
            VirtualKeyCode::CapsLock => 0x39,
            VirtualKeyCode::Alt => 0x3A,
            VirtualKeyCode::Control => 0x3B,
            VirtualKeyCode::F1 => 0x7A,
            VirtualKeyCode::F2 => 0x78,
            VirtualKeyCode::F3 => 0x63,
            VirtualKeyCode::F4 => 0x76,
            VirtualKeyCode::F5 => 0x60,
            VirtualKeyCode::F6 => 0x61,
            VirtualKeyCode::F7 => 0x62,
            VirtualKeyCode::F8 => 0x64,
            VirtualKeyCode::F9 => 0x65,
            VirtualKeyCode::F10 => 0x6D,
            VirtualKeyCode::F11 => 0x67,
            VirtualKeyCode::F12 => 0x6F,
            VirtualKeyCode::Delete => 0x75,
            VirtualKeyCode::Home => 0x73,
            VirtualKeyCode::End => 0x77,
            VirtualKeyCode::PageUp => 0x74,
            VirtualKeyCode::PageDown => 0x79,
            VirtualKeyCode::Left => 0x7B,
            VirtualKeyCode::Right => 0x7C,
            VirtualKeyCode::Down => 0x7D,
            VirtualKeyCode::Up => 0x7E,
        }
    }
}

impl InputInjector for MacOSInputInjector {
    fn has_permission(&self) -> bool {
        unsafe { AXIsProcessTrusted() }
    }

    fn move_mouse(&self, x: f64, y: f64) -> InjectorResult<()> {
        self.post_mouse(CGEventType::MouseMoved, x, y, CGMouseButton::Left)
    }

    fn drag_mouse(&self, x: f64, y: f64, button: MouseButton) -> InjectorResult<()> {
        let event_type = match button {
            MouseButton::Left => CGEventType::LeftMouseDragged,
            MouseButton::Right => CGEventType::RightMouseDragged,
            MouseButton::Middle => CGEventType::OtherMouseDragged,
        };
        self.post_mouse(event_type, x, y, Self::cg_button(button))
    }

    fn mouse_down(&self, button: MouseButton) -> InjectorResult<()> {
        let (x, y) = self.mouse_position()?;
        let event_type = match button {
            MouseButton::Left => CGEventType::LeftMouseDown,
            MouseButton::Right => CGEventType::RightMouseDown,
            MouseButton::Middle => CGEventType::OtherMouseDown,
        };
        self.post_mouse(event_type, x, y, Self::cg_button(button))
    }

    fn mouse_up(&self, button: MouseButton) -> InjectorResult<()> {
        let (x, y) = self.mouse_position()?;
        let event_type = match button {
            MouseButton::Left => CGEventType::LeftMouseUp,
            MouseButton::Right => CGEventType::RightMouseUp,
            MouseButton::Middle => CGEventType::OtherMouseUp,
        };
        self.post_mouse(event_type, x, y, Self::cg_button(button))
    }

    fn key_down(&self, key: VirtualKeyCode) -> InjectorResult<()> {
        self.post_key(Self::to_macos_keycode(key), true)
    }

    fn key_up(&self, key: VirtualKeyCode) -> InjectorResult<()> {
        self.post_key(Self::to_macos_keycode(key), false)
    }

    fn write_char(&self, ch: char) -> InjectorResult<()> {
        // Keycode 0 with a Unicode payload: the payload wins, and no modifier
        // state is attached to the event.
        let mut buf = [0u16; 2];
        let utf16 = ch.encode_utf16(&mut buf);

        for down in [true, false] {
            let event = CGEvent::new_keyboard_event(Self::source()?, 0, down)
                .map_err(|_| InjectorError::Platform("Failed to create keyboard event".into()))?;
            event.set_string_from_utf16_unchecked(utf16);
            event.post(CGEventTapLocation::HID);
        }
        debug!("Typed character {:?}", ch);
        Ok(())
    }

    fn scroll_vertical(&self, amount: i32) -> InjectorResult<()> {
        self.post_scroll(amount, 0)
    }

    fn scroll_horizontal(&self, amount: i32) -> InjectorResult<()> {
        self.post_scroll(0, amount)
    }

    fn supports_horizontal_scroll(&self) -> bool {
        true
    }

    fn mouse_position(&self) -> InjectorResult<(f64, f64)> {
        let event = CGEvent::new(Self::source()?)
            .map_err(|_| InjectorError::Platform("Failed to query cursor location".into()))?;
        let point = event.location();
        Ok((point.x, point.y))
    }

    fn screen_size(&self) -> InjectorResult<(u32, u32)> {
        let bounds = CGDisplay::main().bounds();
        Ok((bounds.size.width as u32, bounds.size.height as u32))
    }
}

#[link(name = "ApplicationServices", kind = "framework")]
unsafe extern "C" {
    fn AXIsProcessTrusted() -> bool;
    fn AXIsProcessTrustedWithOptions(
        options: core_foundation::dictionary::CFDictionaryRef,
    ) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macos_injector_creation() {
        let _injector = MacOSInputInjector::new().unwrap();
    }

    #[test]
    fn test_letters_map_to_ansi_keycodes() {
        assert_eq!(MacOSInputInjector::to_macos_keycode(VirtualKeyCode::A), 0x00);
        assert_eq!(MacOSInputInjector::to_macos_keycode(VirtualKeyCode::Enter), 0x24);
        assert_eq!(MacOSInputInjector::to_macos_keycode(VirtualKeyCode::Meta), 0x37);
    }
}
