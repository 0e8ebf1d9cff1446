//! Named keys and mouse buttons shared by the dispatcher and the injectors

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Mouse button type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Virtual key code (cross-platform)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum VirtualKeyCode {
    // Alphanumeric
    A = 0x0004,
    B = 0x0005,
    C = 0x0006,
    D = 0x0007,
    E = 0x0008,
    F = 0x0009,
    G = 0x000A,
    H = 0x000B,
    I = 0x000C,
    J = 0x000D,
    K = 0x000E,
    L = 0x000F,
    M = 0x0010,
    N = 0x0011,
    O = 0x0012,
    P = 0x0013,
    Q = 0x0014,
    R = 0x0015,
    S = 0x0016,
    T = 0x0017,
    U = 0x0018,
    V = 0x0019,
    W = 0x001A,
    X = 0x001B,
    Y = 0x001C,
    Z = 0x001D,

    // Numbers
    Num1 = 0x001E,
    Num2 = 0x001F,
    Num3 = 0x0020,
    Num4 = 0x0021,
    Num5 = 0x0022,
    Num6 = 0x0023,
    Num7 = 0x0024,
    Num8 = 0x0025,
    Num9 = 0x0026,
    Num0 = 0x0027,

    // Function keys
    F1 = 0x003A,
    F2 = 0x003B,
    F3 = 0x003C,
    F4 = 0x003D,
    F5 = 0x003E,
    F6 = 0x003F,
    F7 = 0x0040,
    F8 = 0x0041,
    F9 = 0x0042,
    F10 = 0x0043,
    F11 = 0x0044,
    F12 = 0x0045,

    // Control keys
    Escape = 0x0029,
    Tab = 0x002B,
    CapsLock = 0x0039,
    Shift = 0x00E1,
    Control = 0x00E0,
    Alt = 0x00E2,
    Meta = 0x00E3,
    Space = 0x002C,
    Enter = 0x0028,
    Backspace = 0x002A,
    Delete = 0x004C,
    Home = 0x004A,
    End = 0x004D,
    PageUp = 0x004B,
    PageDown = 0x004E,

    // Arrow keys
    Left = 0x0050,
    Right = 0x004F,
    Up = 0x0052,
    Down = 0x0051,

    // Punctuation
    Minus = 0x002D,
    Equal = 0x002E,
    LeftBracket = 0x002F,
    RightBracket = 0x0030,
    Backslash = 0x0031,
    Semicolon = 0x0033,
    Quote = 0x0034,
    Grave = 0x0035,
    Comma = 0x0036,
    Period = 0x0037,
    Slash = 0x0038,
}

impl VirtualKeyCode {
    /// Modifier keys released before character-by-character typing
    pub const MODIFIERS: [VirtualKeyCode; 4] = [
        VirtualKeyCode::Shift,
        VirtualKeyCode::Control,
        VirtualKeyCode::Alt,
        VirtualKeyCode::Meta,
    ];

    /// Key for the platform's primary shortcut modifier (Command on macOS)
    pub fn primary_modifier() -> Self {
        if cfg!(target_os = "macos") {
            VirtualKeyCode::Meta
        } else {
            VirtualKeyCode::Control
        }
    }

    /// Whether this key is a modifier
    pub fn is_modifier(self) -> bool {
        Self::MODIFIERS.contains(&self)
    }

    /// Look up a key by the names clients send (`"enter"`, `"cmd"`, `"a"`, `"f5"`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let key = match lower.as_str() {
            "a" => Self::A,
            "b" => Self::B,
            "c" => Self::C,
            "d" => Self::D,
            "e" => Self::E,
            "f" => Self::F,
            "g" => Self::G,
            "h" => Self::H,
            "i" => Self::I,
            "j" => Self::J,
            "k" => Self::K,
            "l" => Self::L,
            "m" => Self::M,
            "n" => Self::N,
            "o" => Self::O,
            "p" => Self::P,
            "q" => Self::Q,
            "r" => Self::R,
            "s" => Self::S,
            "t" => Self::T,
            "u" => Self::U,
            "v" => Self::V,
            "w" => Self::W,
            "x" => Self::X,
            "y" => Self::Y,
            "z" => Self::Z,
            "1" => Self::Num1,
            "2" => Self::Num2,
            "3" => Self::Num3,
            "4" => Self::Num4,
            "5" => Self::Num5,
            "6" => Self::Num6,
            "7" => Self::Num7,
            "8" => Self::Num8,
            "9" => Self::Num9,
            "0" => Self::Num0,
            "f1" => Self::F1,
            "f2" => Self::F2,
            "f3" => Self::F3,
            "f4" => Self::F4,
            "f5" => Self::F5,
            "f6" => Self::F6,
            "f7" => Self::F7,
            "f8" => Self::F8,
            "f9" => Self::F9,
            "f10" => Self::F10,
            "f11" => Self::F11,
            "f12" => Self::F12,
            "esc" | "escape" => Self::Escape,
            "tab" | "\t" => Self::Tab,
            "capslock" => Self::CapsLock,
            "shift" | "shiftleft" | "shiftright" => Self::Shift,
            "ctrl" | "control" | "ctrlleft" | "ctrlright" => Self::Control,
            "alt" | "option" | "altleft" | "altright" | "optionleft" | "optionright" => Self::Alt,
            "cmd" | "command" | "meta" | "win" | "super" | "winleft" | "winright" => Self::Meta,
            "space" | " " => Self::Space,
            "enter" | "return" | "\n" => Self::Enter,
            "backspace" => Self::Backspace,
            "delete" | "del" => Self::Delete,
            "home" => Self::Home,
            "end" => Self::End,
            "pageup" | "pgup" => Self::PageUp,
            "pagedown" | "pgdn" => Self::PageDown,
            "left" => Self::Left,
            "right" => Self::Right,
            "up" => Self::Up,
            "down" => Self::Down,
            "-" | "minus" => Self::Minus,
            "=" | "equal" => Self::Equal,
            "[" => Self::LeftBracket,
            "]" => Self::RightBracket,
            "\\" => Self::Backslash,
            ";" => Self::Semicolon,
            "'" => Self::Quote,
            "`" => Self::Grave,
            "," => Self::Comma,
            "." => Self::Period,
            "/" => Self::Slash,
            _ => return None,
        };
        Some(key)
    }
}

/// Returned when a key name has no mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKey(pub String);

impl fmt::Display for UnknownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key name: {:?}", self.0)
    }
}

impl std::error::Error for UnknownKey {}

impl FromStr for VirtualKeyCode {
    type Err = UnknownKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownKey(s.to_string()))
    }
}
