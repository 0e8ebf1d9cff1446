//! HTTP routes

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use shared_protocol::{Action, ActionResult, ErrorBody};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::dispatch::ActionDispatcher;
use crate::state::AppState;

const INVALID_INPUT: &str = "Invalid input format";

/// Build the control router with tracing and permissive CORS
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/detect", post(detect_handler))
        .route("/configure", post(configure_handler))
        .route("/config", get(config_handler))
        .route("/run", post(run_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run blocking dispatcher work on the blocking pool
async fn blocking<T, F>(state: &AppState, work: F) -> Result<T, ErrorBody>
where
    F: FnOnce(&ActionDispatcher) -> T + Send + 'static,
    T: Send + 'static,
{
    let dispatcher = Arc::clone(&state.dispatcher);
    tokio::task::spawn_blocking(move || work(&dispatcher))
        .await
        .map_err(|e| {
            error!("Dispatcher task failed: {}", e);
            ErrorBody::message(format!("Dispatcher task failed: {e}"))
        })
}

fn parse_body(body: &Bytes) -> Option<Value> {
    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Rejecting request body: {}", e);
            None
        }
    }
}

fn invalid_input() -> Response {
    Json(ErrorBody::message(INVALID_INPUT)).into_response()
}

/// Health check endpoint
async fn health_handler(State(state): State<AppState>) -> Response {
    match blocking(&state, |d| d.host_screen_size()).await {
        Ok(Ok((width, height))) => Json(json!({
            "status": "ok",
            "message": "Control server is running",
            "screen_size": { "width": width, "height": height },
            "version": env!("CARGO_PKG_VERSION"),
        }))
        .into_response(),
        Ok(Err(e)) => {
            error!("Health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::message(e.to_string())),
            )
                .into_response()
        }
        Err(body) => (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response(),
    }
}

async fn detect_handler(State(state): State<AppState>) -> Response {
    let result = blocking(&state, |d| match d.dispatch(Action::Detect) {
        Ok(outcome) => ActionResult::ok(outcome),
        Err(e) => {
            warn!(kind = e.kind(), "Detect failed: {}", e);
            e.to_body().into()
        }
    })
    .await
    .unwrap_or_else(ActionResult::from);
    Json(result).into_response()
}

/// Accepts the mirror rectangle in snake_case or camelCase
async fn configure_handler(State(state): State<AppState>, body: Bytes) -> Response {
    let Some(Value::Object(mut fields)) = parse_body(&body) else {
        return invalid_input();
    };
    fields.insert("action".to_string(), Value::from("configure"));

    let result = blocking(&state, move |d| d.dispatch_value(Value::Object(fields)))
        .await
        .unwrap_or_else(ActionResult::from);
    Json(result).into_response()
}

async fn config_handler(State(state): State<AppState>) -> Response {
    Json(json!({
        "status": "ok",
        "config": state.dispatcher.mapping(),
    }))
    .into_response()
}

/// One action object, or a list run in order
async fn run_handler(State(state): State<AppState>, body: Bytes) -> Response {
    match parse_body(&body) {
        Some(Value::Array(actions)) => {
            match blocking(&state, move |d| d.dispatch_batch(actions)).await {
                Ok(reply) => Json(reply).into_response(),
                Err(body) => Json(body).into_response(),
            }
        }
        Some(action @ Value::Object(_)) => {
            let result = blocking(&state, move |d| d.dispatch_value(action))
                .await
                .unwrap_or_else(ActionResult::from);
            Json(result).into_response()
        }
        _ => invalid_input(),
    }
}
