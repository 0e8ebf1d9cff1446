//! Action dispatcher: decode, map coordinates, inject, report

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use capture::ScreenCapture;
use device_mapping::{HostTransform, MappingHandle, infer, infer_from_content};
use input_injector::InputInjector;
use serde_json::Value;
use shared_protocol::{
    Action, ActionOutcome, ActionResult, BatchReply, ClickOutcome, ConfigureArgs, ConfigureOutcome,
    ControlError, ControlResult, DetectOutcome, DragArgs, DragOutcome, HotkeyArgs, HotkeyOutcome,
    KeyArgs, KeyOutcome, MappingConfig, MouseButton, MoveArgs, MoveOutcome, PointArgs, Rect,
    ScreenMode, ScreenSizeOutcome, ScreenshotOutcome, ScrollArgs, ScrollDirection, ScrollMethod,
    ScrollOutcome, Size, SleepArgs, SleepOutcome, TypeArgs, TypeOutcome, VirtualKeyCode,
};
use tracing::{debug, info, warn};
use uuid::Uuid;
use window_locator::{ScriptRunner, WindowLocator};

use crate::config::DispatchSettings;
use crate::text_input::TextTyper;

/// Scroll distance in pixels when a request gives none
pub const DEFAULT_SCROLL_DISTANCE: i32 = 100;

/// Largest scroll gesture honored; longer requests are clamped to it
pub const MAX_SCROLL_DISTANCE: i32 = 10_000;

/// Longest timed move or drag a request may ask for
pub const MAX_MOTION_DURATION: Duration = Duration::from_secs(60);

/// Longest pause between typed characters a request may ask for
pub const MAX_TYPE_INTERVAL: Duration = Duration::from_secs(2);

/// Number of wheel steps for a scroll gesture of `distance` pixels.
///
/// Short gestures get a floor of steps so they still register on the device.
/// Distances above [`MAX_SCROLL_DISTANCE`] count as that maximum.
pub fn scroll_clicks(distance: i32) -> u32 {
    let distance = distance.min(MAX_SCROLL_DISTANCE);
    let d = distance as f64;
    let clicks = if distance <= 50 {
        (d * 0.4).max(8.0)
    } else if distance <= 150 {
        (d * 0.25).max(12.0)
    } else if distance <= 300 {
        (d * 0.18).max(18.0)
    } else {
        (d * 0.12).max(25.0)
    };
    clicks as u32
}

fn seconds(value: f64, what: &str) -> ControlResult<Duration> {
    Duration::try_from_secs_f64(value).map_err(|_| {
        ControlError::InvalidArgument(format!("{what} must be a non-negative number of seconds"))
    })
}

fn seconds_at_most(value: f64, what: &str, max: Duration) -> ControlResult<Duration> {
    let duration = seconds(value, what)?;
    if duration > max {
        return Err(ControlError::InvalidArgument(format!(
            "{what} must be at most {} seconds",
            max.as_secs_f64()
        )));
    }
    Ok(duration)
}

fn parse_key(name: &str) -> ControlResult<VirtualKeyCode> {
    name.parse()
        .map_err(|e: shared_protocol::UnknownKey| ControlError::InvalidArgument(e.to_string()))
}

/// Executes actions against the injection, capture and scripting collaborators.
///
/// Every call blocks for as long as the action takes; run it off the async
/// runtime. Each action reads the mapping once through a snapshot.
pub struct ActionDispatcher {
    injector: Arc<dyn InputInjector>,
    capture: Arc<dyn ScreenCapture>,
    scripts: Arc<dyn ScriptRunner>,
    locator: WindowLocator,
    mapping: Arc<MappingHandle>,
    settings: DispatchSettings,
}

impl ActionDispatcher {
    pub fn new(
        injector: Arc<dyn InputInjector>,
        capture: Arc<dyn ScreenCapture>,
        scripts: Arc<dyn ScriptRunner>,
        mapping: Arc<MappingHandle>,
        settings: DispatchSettings,
    ) -> Self {
        let locator = WindowLocator::new(
            Arc::clone(&scripts),
            settings.app_name.clone(),
            settings.script_timeout,
        );
        Self {
            injector,
            capture,
            scripts,
            locator,
            mapping,
            settings,
        }
    }

    pub fn mapping(&self) -> MappingConfig {
        self.mapping.snapshot()
    }

    /// Host display size in points
    pub fn host_screen_size(&self) -> ControlResult<(u32, u32)> {
        Ok(self.injector.screen_size()?)
    }

    /// Decode and run one action, rendering any failure as an error body
    pub fn dispatch_value(&self, value: Value) -> ActionResult {
        match Action::from_value(value).and_then(|action| self.dispatch(action)) {
            Ok(outcome) => ActionResult::ok(outcome),
            Err(e) => {
                warn!(kind = e.kind(), "Action failed: {}", e);
                e.to_body().into()
            }
        }
    }

    /// Run actions strictly in order; a failure does not stop later actions
    pub fn dispatch_batch(&self, values: Vec<Value>) -> BatchReply {
        debug!("Running batch of {} actions", values.len());
        BatchReply::done(values.into_iter().map(|v| self.dispatch_value(v)).collect())
    }

    pub fn dispatch(&self, action: Action) -> ControlResult<ActionOutcome> {
        debug!(action = action.kind(), "Dispatching");
        match action {
            Action::Click(args) => self.click(args),
            Action::Move(args) => self.move_to(args),
            Action::Drag(args) => self.drag(args),
            Action::Type(args) => self.type_text(args),
            Action::Key(args) => self.key(args),
            Action::Hotkey(args) => self.hotkey(args),
            Action::Scroll(args) => self.scroll(args),
            Action::Screenshot => self.screenshot(),
            Action::GetScreenSize => self.screen_size(),
            Action::Configure(args) => self.configure(args),
            Action::Detect => self.detect(),
            Action::Sleep(args) => self.sleep(args),
        }
    }

    fn click(&self, PointArgs { x, y }: PointArgs) -> ControlResult<ActionOutcome> {
        let config = self.mapping.snapshot();
        let (hx, hy) = config.to_host(x, y);
        let in_bounds = config.host_in_mirror(hx, hy);

        if in_bounds == Some(false) {
            let mirror = config.mirror_rect();
            warn!(
                device = ?(x, y),
                host = ?(hx, hy),
                mirror = ?(mirror.x, mirror.y, mirror.right(), mirror.bottom()),
                "Click lands outside the mirror region; the mirrored app may lose focus"
            );
        }
        if config.enabled {
            debug!(device = ?(x, y), host = ?(hx, hy), "Click");
        }

        self.injector
            .click_at(hx as f64, hy as f64, MouseButton::Left)?;

        Ok(ActionOutcome::Click(ClickOutcome {
            device_coords: [x, y],
            host_coords: [hx, hy],
            in_bounds,
        }))
    }

    fn move_to(&self, args: MoveArgs) -> ControlResult<ActionOutcome> {
        let duration = match args.duration {
            Some(secs) => seconds_at_most(secs, "duration", MAX_MOTION_DURATION)?,
            None => self.settings.move_duration,
        };
        let (hx, hy) = self.mapping.snapshot().to_host(args.x, args.y);

        self.injector.move_smoothly(hx as f64, hy as f64, duration)?;

        Ok(ActionOutcome::Move(MoveOutcome {
            device_coords: [args.x, args.y],
            host_coords: [hx, hy],
            duration: duration.as_secs_f64(),
        }))
    }

    fn drag(&self, args: DragArgs) -> ControlResult<ActionOutcome> {
        let duration = match args.duration {
            Some(secs) => seconds_at_most(secs, "duration", MAX_MOTION_DURATION)?,
            None => self.settings.drag_duration,
        };
        let config = self.mapping.snapshot();
        let (hx, hy) = config.to_host(args.x, args.y);
        let (hx2, hy2) = config.to_host(args.x2, args.y2);

        self.injector.move_mouse(hx as f64, hy as f64)?;
        self.injector
            .drag_to(hx2 as f64, hy2 as f64, duration, MouseButton::Left)?;

        Ok(ActionOutcome::Drag(DragOutcome {
            device_from: [args.x, args.y],
            device_to: [args.x2, args.y2],
            host_from: [hx, hy],
            host_to: [hx2, hy2],
            duration: duration.as_secs_f64(),
        }))
    }

    fn type_text(&self, args: TypeArgs) -> ControlResult<ActionOutcome> {
        let interval = match args.interval {
            Some(secs) if secs != 0.0 => seconds_at_most(secs, "interval", MAX_TYPE_INTERVAL)?,
            _ => self.settings.default_type_interval,
        };
        info!(
            "Typing {} characters with interval {:?}",
            args.text.chars().count(),
            interval
        );

        let typed = TextTyper::new(
            self.injector.as_ref(),
            self.scripts.as_ref(),
            self.settings.script_timeout,
        )
        .replace_text(&args.text, interval)?;

        Ok(ActionOutcome::Type(TypeOutcome {
            text: args.text,
            method: typed.method,
            interval: interval.as_secs_f64(),
            skipped: typed.skipped,
        }))
    }

    fn key(&self, KeyArgs { key }: KeyArgs) -> ControlResult<ActionOutcome> {
        self.injector.tap_key(parse_key(&key)?)?;
        Ok(ActionOutcome::Key(KeyOutcome { key }))
    }

    fn hotkey(&self, HotkeyArgs { keys }: HotkeyArgs) -> ControlResult<ActionOutcome> {
        let codes = keys
            .names()
            .into_iter()
            .map(parse_key)
            .collect::<ControlResult<Vec<_>>>()?;
        if codes.is_empty() {
            return Err(ControlError::InvalidArgument("keys must not be empty".to_string()));
        }

        self.injector.hotkey(&codes)?;
        Ok(ActionOutcome::Hotkey(HotkeyOutcome { keys }))
    }

    fn scroll(&self, args: ScrollArgs) -> ControlResult<ActionOutcome> {
        let config = self.mapping.snapshot();
        let (x, y) = match (args.x, args.y) {
            (Some(x), Some(y)) => (x, y),
            (x, y) => {
                let (cx, cy) = match config.logical_center() {
                    Some(center) => center,
                    None => {
                        let (w, h) = self.injector.screen_size()?;
                        ((w / 2) as i32, (h / 2) as i32)
                    }
                };
                (x.unwrap_or(cx), y.unwrap_or(cy))
            }
        };
        let requested = args.distance.unwrap_or(DEFAULT_SCROLL_DISTANCE);
        let distance = requested.min(MAX_SCROLL_DISTANCE);
        if distance < requested {
            warn!(requested, distance, "Scroll distance clamped");
        }
        let direction = args.direction;
        let clicks = scroll_clicks(distance);
        let (hx, hy) = config.to_host(x, y);

        let horizontal = direction.is_horizontal();
        if horizontal && !self.injector.supports_horizontal_scroll() {
            return Err(ControlError::UnsupportedOperation(
                "Horizontal scrolling not supported on this platform".to_string(),
            ));
        }

        info!(
            device = ?(x, y),
            host = ?(hx, hy),
            ?direction,
            distance,
            clicks,
            "Scroll"
        );
        self.injector.move_mouse(hx as f64, hy as f64)?;

        let unit = self.settings.scroll_unit;
        let amount = match direction {
            ScrollDirection::Up | ScrollDirection::Left => unit,
            ScrollDirection::Down | ScrollDirection::Right => -unit,
        };
        for _ in 0..clicks {
            if horizontal {
                self.injector.scroll_horizontal(amount)?;
            } else {
                self.injector.scroll_vertical(amount)?;
            }
        }

        Ok(ActionOutcome::Scroll(ScrollOutcome {
            method: if horizontal {
                ScrollMethod::HorizontalScroll
            } else {
                ScrollMethod::VerticalScroll
            },
            device_coords: [x, y],
            host_coords: [hx, hy],
            direction,
            clicks,
            distance,
        }))
    }

    fn screenshot(&self) -> ControlResult<ActionOutcome> {
        let config = self.mapping.snapshot();
        let region = config.enabled.then(|| config.mirror_rect());

        let frame = self.capture.capture(region)?;
        info!(
            region = ?region.map(|r| r.to_array()),
            "Screenshot {}x{}",
            frame.width,
            frame.height
        );

        let settings = &self.settings.screenshot;
        let (data_url, path) = if settings.inline_data_url || settings.persist {
            let png = frame.to_png()?;
            let data_url = settings
                .inline_data_url
                .then(|| format!("data:image/png;base64,{}", STANDARD.encode(&png)));
            let path = if settings.persist {
                self.persist_png(&png)
            } else {
                None
            };
            (data_url, path)
        } else {
            (None, None)
        };

        Ok(ActionOutcome::Screenshot(ScreenshotOutcome {
            screenshot_size: Size {
                width: frame.width,
                height: frame.height,
            },
            device_region: region.is_some(),
            region_info: region.map(|r: Rect| r.to_array()),
            data_url,
            path,
        }))
    }

    /// Best effort: a write failure drops the path from the reply
    fn persist_png(&self, png: &[u8]) -> Option<String> {
        let path: PathBuf = self
            .settings
            .screenshot
            .directory
            .join(format!("screenshot_{}.png", Uuid::new_v4()));
        match std::fs::write(&path, png) {
            Ok(()) => {
                debug!("Screenshot saved to {}", path.display());
                Some(path.to_string_lossy().into_owned())
            }
            Err(e) => {
                warn!("Failed to save screenshot to {}: {}", path.display(), e);
                None
            }
        }
    }

    fn screen_size(&self) -> ControlResult<ActionOutcome> {
        let config = self.mapping.snapshot();
        let outcome = if config.enabled {
            ScreenSizeOutcome {
                width: config.logical_width,
                height: config.logical_height,
                mode: ScreenMode::Device,
            }
        } else {
            let (width, height) = self.injector.screen_size()?;
            ScreenSizeOutcome {
                width: width as i32,
                height: height as i32,
                mode: ScreenMode::Host,
            }
        };
        Ok(ActionOutcome::GetScreenSize(outcome))
    }

    /// Commit a mirror rectangle, matching it to the nearest device profile
    fn apply_mirror(&self, content: Rect) -> ControlResult<MappingConfig> {
        let inference = infer_from_content(content)?;
        let config = inference.mapping();
        self.mapping.replace(config);
        info!(
            device = inference.profile.name,
            "Mapping enabled: {}x{} logical -> {}x{} at ({}, {})",
            config.logical_width,
            config.logical_height,
            config.mirror_width,
            config.mirror_height,
            config.mirror_x,
            config.mirror_y
        );
        Ok(config)
    }

    fn configure(&self, args: ConfigureArgs) -> ControlResult<ActionOutcome> {
        let config = self.apply_mirror(Rect::new(
            args.mirror_x,
            args.mirror_y,
            args.mirror_width,
            args.mirror_height,
        ))?;
        Ok(ActionOutcome::Configure(ConfigureOutcome { config }))
    }

    fn detect(&self) -> ControlResult<ActionOutcome> {
        let window = self.locator.locate()?;
        let content = infer(&window)?.content;
        let config = self.apply_mirror(content)?;

        Ok(ActionOutcome::Detect(DetectOutcome {
            window_detected: window,
            content_area: content,
            message: format!(
                "Successfully auto-configured for {}x{} device",
                config.logical_width, config.logical_height
            ),
            config,
        }))
    }

    fn sleep(&self, SleepArgs { seconds: secs }: SleepArgs) -> ControlResult<ActionOutcome> {
        thread::sleep(seconds(secs, "seconds")?);
        Ok(ActionOutcome::Sleep(SleepOutcome { seconds: secs }))
    }
}
