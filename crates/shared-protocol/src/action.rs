//! Control actions accepted by the dispatcher

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::de;
use crate::{ControlError, ControlResult};

/// Every action kind the dispatcher understands, including accepted aliases
pub const ACTION_KINDS: &[&str] = &[
    "click",
    "move",
    "drag",
    "type",
    "key",
    "hotkey",
    "scroll",
    "screenshot",
    "get_screen_size",
    "configure",
    "configure_ios",
    "detect",
    "detect_ios_mirror",
    "sleep",
];

/// A single point in logical device coordinates
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PointArgs {
    #[serde(deserialize_with = "de::int")]
    pub x: i32,
    #[serde(deserialize_with = "de::int")]
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MoveArgs {
    #[serde(deserialize_with = "de::int")]
    pub x: i32,
    #[serde(deserialize_with = "de::int")]
    pub y: i32,
    /// Seconds
    #[serde(default, deserialize_with = "de::opt_float")]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DragArgs {
    #[serde(deserialize_with = "de::int")]
    pub x: i32,
    #[serde(deserialize_with = "de::int")]
    pub y: i32,
    #[serde(deserialize_with = "de::int")]
    pub x2: i32,
    #[serde(deserialize_with = "de::int")]
    pub y2: i32,
    /// Seconds
    #[serde(default, deserialize_with = "de::opt_float")]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TypeArgs {
    pub text: String,
    /// Seconds between characters; zero or absent selects the server default
    #[serde(default, deserialize_with = "de::opt_float")]
    pub interval: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyArgs {
    pub key: String,
}

/// A single key name or an ordered list held together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HotkeyKeys {
    One(String),
    Many(Vec<String>),
}

impl HotkeyKeys {
    pub fn names(&self) -> Vec<&str> {
        match self {
            HotkeyKeys::One(key) => vec![key.as_str()],
            HotkeyKeys::Many(keys) => keys.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HotkeyArgs {
    pub keys: HotkeyKeys,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl ScrollDirection {
    pub fn is_horizontal(self) -> bool {
        matches!(self, ScrollDirection::Left | ScrollDirection::Right)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ScrollArgs {
    #[serde(default, deserialize_with = "de::opt_int")]
    pub x: Option<i32>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub y: Option<i32>,
    /// Pixels
    #[serde(default, deserialize_with = "de::opt_int")]
    pub distance: Option<i32>,
    #[serde(default)]
    pub direction: ScrollDirection,
}

/// Mirror rectangle in host display points; both snake_case and camelCase are accepted
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ConfigureArgs {
    #[serde(alias = "mirrorX", deserialize_with = "de::int")]
    pub mirror_x: i32,
    #[serde(alias = "mirrorY", deserialize_with = "de::int")]
    pub mirror_y: i32,
    #[serde(alias = "mirrorWidth", deserialize_with = "de::int")]
    pub mirror_width: i32,
    #[serde(alias = "mirrorHeight", deserialize_with = "de::int")]
    pub mirror_height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SleepArgs {
    #[serde(deserialize_with = "de::float")]
    pub seconds: f64,
}

/// A decoded control action
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Click(PointArgs),
    Move(MoveArgs),
    Drag(DragArgs),
    Type(TypeArgs),
    Key(KeyArgs),
    Hotkey(HotkeyArgs),
    Scroll(ScrollArgs),
    Screenshot,
    GetScreenSize,
    #[serde(alias = "configure_ios")]
    Configure(ConfigureArgs),
    #[serde(alias = "detect_ios_mirror")]
    Detect,
    Sleep(SleepArgs),
}

impl Action {
    /// Decode one action object.
    ///
    /// Unrecognized kinds are reported as [`ControlError::UnknownAction`] before
    /// any field validation; malformed fields become
    /// [`ControlError::InvalidArgument`].
    pub fn from_value(value: Value) -> ControlResult<Self> {
        let Some(object) = value.as_object() else {
            return Err(ControlError::InvalidArgument(
                "action must be a JSON object".to_string(),
            ));
        };

        let kind = match object.get("action") {
            Some(Value::String(kind)) => kind.clone(),
            Some(other) => return Err(ControlError::UnknownAction(other.to_string())),
            None => {
                return Err(ControlError::InvalidArgument(
                    "missing field `action`".to_string(),
                ));
            }
        };

        if !ACTION_KINDS.contains(&kind.as_str()) {
            return Err(ControlError::UnknownAction(kind));
        }

        serde_json::from_value(value).map_err(|e| ControlError::InvalidArgument(e.to_string()))
    }

    /// Canonical kind name echoed in results
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Click(_) => "click",
            Action::Move(_) => "move",
            Action::Drag(_) => "drag",
            Action::Type(_) => "type",
            Action::Key(_) => "key",
            Action::Hotkey(_) => "hotkey",
            Action::Scroll(_) => "scroll",
            Action::Screenshot => "screenshot",
            Action::GetScreenSize => "get_screen_size",
            Action::Configure(_) => "configure",
            Action::Detect => "detect",
            Action::Sleep(_) => "sleep",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_click_with_float_and_string_coordinates() {
        let action = Action::from_value(json!({"action": "click", "x": 10.7, "y": "20"})).unwrap();
        assert_eq!(action, Action::Click(PointArgs { x: 10, y: 20 }));
    }

    #[test]
    fn test_decode_unknown_kind() {
        let err = Action::from_value(json!({"action": "frobnicate"})).unwrap_err();
        assert_eq!(err.to_string(), "Unknown action: frobnicate");
    }

    #[test]
    fn test_decode_missing_field_is_invalid_argument() {
        let err =
            Action::from_value(json!({"action": "drag", "x": 1, "y": 2, "x2": 3})).unwrap_err();
        assert!(matches!(err, ControlError::InvalidArgument(ref msg) if msg.contains("y2")));
    }

    #[test]
    fn test_decode_configure_accepts_both_naming_conventions() {
        let snake = Action::from_value(json!({
            "action": "configure",
            "mirror_x": 100, "mirror_y": 50, "mirror_width": 390, "mirror_height": 844
        }))
        .unwrap();
        let camel = Action::from_value(json!({
            "action": "configure_ios",
            "mirrorX": 100, "mirrorY": 50, "mirrorWidth": 390, "mirrorHeight": 844
        }))
        .unwrap();
        assert_eq!(snake, camel);
    }

    #[test]
    fn test_decode_unit_kinds_and_aliases() {
        assert_eq!(
            Action::from_value(json!({"action": "detect_ios_mirror"})).unwrap(),
            Action::Detect
        );
        assert_eq!(
            Action::from_value(json!({"action": "screenshot"})).unwrap().kind(),
            "screenshot"
        );
    }

    #[test]
    fn test_decode_scroll_defaults() {
        let action = Action::from_value(json!({"action": "scroll"})).unwrap();
        assert_eq!(action, Action::Scroll(ScrollArgs::default()));
    }

    #[test]
    fn test_decode_hotkey_single_and_list() {
        let one = Action::from_value(json!({"action": "hotkey", "keys": "enter"})).unwrap();
        let many =
            Action::from_value(json!({"action": "hotkey", "keys": ["cmd", "shift", "z"]})).unwrap();
        match (one, many) {
            (Action::Hotkey(one), Action::Hotkey(many)) => {
                assert_eq!(one.keys.names(), vec!["enter"]);
                assert_eq!(many.keys.names(), vec!["cmd", "shift", "z"]);
            }
            other => panic!("unexpected decode: {other:?}"),
        }
    }

    #[test]
    fn test_decode_non_object() {
        let err = Action::from_value(json!("click")).unwrap_err();
        assert!(matches!(err, ControlError::InvalidArgument(_)));
    }
}
