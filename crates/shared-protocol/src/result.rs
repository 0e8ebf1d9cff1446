//! Reply shapes returned to control clients

use serde::Serialize;

use crate::{ErrorBody, HotkeyKeys, MappingConfig, Rect, ScrollDirection, WindowFrame};

/// Top-level `status` discriminator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Error,
    Done,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClickOutcome {
    pub device_coords: [i32; 2],
    pub host_coords: [i32; 2],
    /// Present only while mapping is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_bounds: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoveOutcome {
    pub device_coords: [i32; 2],
    pub host_coords: [i32; 2],
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragOutcome {
    pub device_from: [i32; 2],
    pub device_to: [i32; 2],
    pub host_from: [i32; 2],
    pub host_to: [i32; 2],
    pub duration: f64,
}

/// Which text-injection strategy delivered the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeMethod {
    Applescript,
    CharacterByCharacter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeOutcome {
    pub text: String,
    pub method: TypeMethod,
    /// Seconds between characters actually used
    pub interval: f64,
    /// Characters that could not be injected and were skipped
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyOutcome {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HotkeyOutcome {
    pub keys: HotkeyKeys,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollMethod {
    VerticalScroll,
    HorizontalScroll,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollOutcome {
    pub method: ScrollMethod,
    pub device_coords: [i32; 2],
    pub host_coords: [i32; 2],
    pub direction: ScrollDirection,
    pub clicks: u32,
    pub distance: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenshotOutcome {
    pub screenshot_size: Size,
    pub device_region: bool,
    pub region_info: Option<[i32; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenMode {
    Device,
    Host,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenSizeOutcome {
    pub width: i32,
    pub height: i32,
    pub mode: ScreenMode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigureOutcome {
    pub config: MappingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectOutcome {
    pub window_detected: WindowFrame,
    pub content_area: Rect,
    pub config: MappingConfig,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepOutcome {
    pub seconds: f64,
}

/// Kind-specific echo of a successful action, tagged by `action`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionOutcome {
    Click(ClickOutcome),
    Move(MoveOutcome),
    Drag(DragOutcome),
    Type(TypeOutcome),
    Key(KeyOutcome),
    Hotkey(HotkeyOutcome),
    Scroll(ScrollOutcome),
    Screenshot(ScreenshotOutcome),
    GetScreenSize(ScreenSizeOutcome),
    Configure(ConfigureOutcome),
    Detect(DetectOutcome),
    Sleep(SleepOutcome),
}

/// Outcome of one dispatched action: `{status:"ok", action, ...}` or an error body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionResult {
    Ok(OkBody),
    Error(ErrorBody),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OkBody {
    pub status: Status,
    #[serde(flatten)]
    pub outcome: ActionOutcome,
}

impl ActionResult {
    pub fn ok(outcome: ActionOutcome) -> Self {
        ActionResult::Ok(OkBody {
            status: Status::Ok,
            outcome,
        })
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, ActionResult::Ok(_))
    }
}

impl From<ErrorBody> for ActionResult {
    fn from(body: ErrorBody) -> Self {
        ActionResult::Error(body)
    }
}

/// Reply to a batched `/run`: results in submission order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReply {
    pub status: Status,
    pub results: Vec<ActionResult>,
}

impl BatchReply {
    pub fn done(results: Vec<ActionResult>) -> Self {
        Self {
            status: Status::Done,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_result_carries_status_and_action_tag() {
        let result = ActionResult::ok(ActionOutcome::GetScreenSize(ScreenSizeOutcome {
            width: 390,
            height: 844,
            mode: ScreenMode::Device,
        }));
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "status": "ok",
                "action": "get_screen_size",
                "width": 390,
                "height": 844,
                "mode": "device"
            })
        );
    }

    #[test]
    fn test_type_method_wire_names() {
        assert_eq!(
            serde_json::to_value(TypeMethod::CharacterByCharacter).unwrap(),
            json!("character_by_character")
        );
        assert_eq!(serde_json::to_value(TypeMethod::Applescript).unwrap(), json!("applescript"));
    }
}
