//! End-to-end tests of the HTTP surface against recording collaborators

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use capture::mock::MockCapture;
use control_server::{ActionDispatcher, AppState, DispatchSettings, router};
use device_mapping::MappingHandle;
use http_body_util::BodyExt;
use input_injector::mock::{Injected, RecordingInjector};
use serde_json::{Value, json};
use tower::ServiceExt;
use window_locator::{MockScriptRunner, ScriptOutput};

fn app_with(injector: Arc<RecordingInjector>, scripts: MockScriptRunner) -> Router {
    let mut settings = DispatchSettings::default();
    settings.screenshot.persist = false;
    settings.move_duration = Duration::ZERO;
    let dispatcher = ActionDispatcher::new(
        injector,
        Arc::new(MockCapture::default()),
        Arc::new(scripts),
        Arc::new(MappingHandle::new()),
        settings,
    );
    router(AppState::new(dispatcher))
}

fn app() -> Router {
    app_with(Arc::new(RecordingInjector::new()), MockScriptRunner::new())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post(app: &Router, uri: &str, body: Value) -> Value {
    let (status, value) = send(app, Method::POST, uri, Some(&body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    value
}

// ── /health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_reports_screen_size() {
    let app = app_with(
        Arc::new(RecordingInjector::new().with_screen(1512, 982)),
        MockScriptRunner::new(),
    );
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["screen_size"], json!({"width": 1512, "height": 982}));
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_fails_with_500() {
    let app = app_with(
        Arc::new(RecordingInjector::new().failing()),
        MockScriptRunner::new(),
    );
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(body["error"].is_string());
}

// ── /configure and /config ────────────────────────────────────────────────────

#[tokio::test]
async fn test_config_starts_disabled_with_default_device() {
    let (status, body) = send(&app(), Method::GET, "/config", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["config"]["enabled"], false);
    assert_eq!(body["config"]["logical_width"], 393);
    assert_eq!(body["config"]["logical_height"], 852);
    assert_eq!(body["config"]["aspect_ratio"], 2.17);
}

#[tokio::test]
async fn test_configure_then_get_screen_size() {
    let app = app();
    let reply = post(
        &app,
        "/configure",
        json!({"mirror_x": 100, "mirror_y": 50, "mirror_width": 390, "mirror_height": 844}),
    )
    .await;
    assert_eq!(reply["status"], "ok");
    assert_eq!(reply["action"], "configure");
    let ratio = reply["config"]["aspect_ratio"].as_f64().unwrap();
    assert!((ratio - 2.1641).abs() < 1e-4);

    let reply = post(&app, "/run", json!({"action": "get_screen_size"})).await;
    assert_eq!(
        reply,
        json!({"status": "ok", "action": "get_screen_size", "width": 390, "height": 844, "mode": "device"})
    );

    let (_, config) = send(&app, Method::GET, "/config", None).await;
    assert_eq!(config["config"]["mirror_x"], 100);
    assert_eq!(config["config"]["enabled"], true);
}

#[tokio::test]
async fn test_configure_accepts_camel_case() {
    let reply = post(
        &app(),
        "/configure",
        json!({"mirrorX": 0, "mirrorY": 0, "mirrorWidth": 834, "mirrorHeight": 1194}),
    )
    .await;
    assert_eq!(reply["config"]["logical_width"], 834);
}

#[tokio::test]
async fn test_configure_missing_field_is_error_body() {
    let reply = post(&app(), "/configure", json!({"mirror_x": 0})).await;
    assert_eq!(reply["status"], "error");
    assert!(reply["error"].as_str().unwrap().contains("mirror_y"));
}

// ── /run ──────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_run_unknown_action() {
    let reply = post(&app(), "/run", json!({"action": "frobnicate"})).await;
    assert_eq!(reply, json!({"status": "error", "error": "Unknown action: frobnicate"}));
}

#[tokio::test]
async fn test_run_rejects_scalar_body() {
    for body in ["42", "\"click\"", "null", "{not json"] {
        let (status, reply) = send(&app(), Method::POST, "/run", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply, json!({"status": "error", "error": "Invalid input format"}));
    }
}

#[tokio::test]
async fn test_run_batch_in_order_despite_failure() {
    let injector = Arc::new(RecordingInjector::new());
    let app = app_with(injector.clone(), MockScriptRunner::new());

    let reply = post(
        &app,
        "/run",
        json!([
            {"action": "move", "x": 5, "y": 6},
            {"action": "scroll", "direction": "diagonal"},
            {"action": "click", "x": 7, "y": 8},
        ]),
    )
    .await;

    assert_eq!(reply["status"], "done");
    let results = reply["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["action"], "move");
    assert_eq!(results[1]["status"], "error");
    assert_eq!(results[2]["action"], "click");

    let events = injector.events();
    let first_move = events
        .iter()
        .position(|e| *e == Injected::Move { x: 5.0, y: 6.0 })
        .unwrap();
    let click_move = events
        .iter()
        .position(|e| *e == Injected::Move { x: 7.0, y: 8.0 })
        .unwrap();
    assert!(first_move < click_move);
}

#[tokio::test]
async fn test_run_oversized_duration_is_error_and_server_keeps_serving() {
    let app = app();
    let reply = post(
        &app,
        "/run",
        json!({"action": "move", "x": 1, "y": 1, "duration": 1e9}),
    )
    .await;
    assert_eq!(reply["status"], "error");

    let (status, _) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_run_empty_batch() {
    let reply = post(&app(), "/run", json!([])).await;
    assert_eq!(reply, json!({"status": "done", "results": []}));
}

#[tokio::test]
async fn test_run_type_falls_back_to_characters() {
    let injector = Arc::new(RecordingInjector::new());
    let mut scripts = MockScriptRunner::new();
    scripts
        .expect_run()
        .returning(|_, _| Ok(ScriptOutput::failed("System Events got an error")));
    let app = app_with(injector.clone(), scripts);

    let reply = post(&app, "/run", json!({"action": "type", "text": "ab", "interval": 0})).await;
    assert_eq!(reply["method"], "character_by_character");
    assert_eq!(reply["interval"], 0.02);

    let chars: Vec<_> = injector
        .timed_events()
        .into_iter()
        .filter(|(_, e)| matches!(e, Injected::Char(_)))
        .collect();
    assert_eq!(chars.len(), 2);
    assert!(chars[1].0.duration_since(chars[0].0) >= Duration::from_millis(20));
}

// ── /detect ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_detect_configures_mapping() {
    let mut scripts = MockScriptRunner::new();
    scripts.expect_run().times(1).returning(|_, _| {
        Ok(ScriptOutput::ok(
            r#"{"found":true,"x":0,"y":25,"width":410,"height":892,"app":"iPhone Mirroring","bundle":"com.apple.ScreenContinuity"}"#,
        ))
    });
    let app = app_with(Arc::new(RecordingInjector::new()), scripts);

    let (status, reply) = send(&app, Method::POST, "/detect", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["status"], "ok");
    assert_eq!(reply["content_area"], json!({"x": 10, "y": 63, "width": 390, "height": 844}));
    assert_eq!(reply["config"]["logical_width"], 390);
    assert_eq!(reply["window_detected"]["bundle_id"], "com.apple.ScreenContinuity");
}

#[tokio::test]
async fn test_detect_timeout_is_error_body() {
    let mut scripts = MockScriptRunner::new();
    scripts
        .expect_run()
        .returning(|_, _| Err(window_locator::LocateError::Timeout { after_ms: 5000 }));
    let app = app_with(Arc::new(RecordingInjector::new()), scripts);

    let (status, reply) = send(&app, Method::POST, "/detect", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["status"], "error");
    assert_eq!(reply["error"], "Window query timed out after 5000ms");
    assert!(reply["suggestion"].is_string());
}
