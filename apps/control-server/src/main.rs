//! Mirror Control Server
//!
//! Usage: `control-server [PORT] [--bind ADDR] [--config FILE] [--log-level FILTER]`

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use device_mapping::MappingHandle;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use window_locator::{OsaScriptRunner, ScriptRunner};

use control_server::{ActionDispatcher, AppState, Cli, ServerConfig, router};

fn init_tracing(log_level: Option<&str>) -> anyhow::Result<()> {
    let filter = match (EnvFilter::try_from_default_env(), log_level) {
        (Ok(filter), _) => filter,
        (Err(_), Some(level)) => EnvFilter::try_new(level).context("invalid log level")?,
        (Err(_), None) => EnvFilter::new("info")
            .add_directive("control_server=debug".parse()?)
            .add_directive("tower_http=debug".parse()?),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ServerConfig::resolve(&cli).context("failed to load configuration")?;
    init_tracing(config.server.log_level.as_deref())?;

    info!("Starting mirror control server");

    let injector = input_injector::create_injector().context("input injection unavailable")?;
    if !injector.has_permission() {
        warn!("Accessibility permission not granted; requesting it");
        if !input_injector::request_permission() {
            warn!("Input injection will fail until accessibility access is granted");
        }
    }

    if !capture::has_screen_recording_permission() {
        warn!("Screen recording permission not granted; requesting it");
        capture::request_screen_recording_permission();
    }
    let capture = capture::create_capture().context("screen capture unavailable")?;

    let scripts: Arc<dyn ScriptRunner> = Arc::new(OsaScriptRunner);
    let dispatcher = ActionDispatcher::new(
        injector,
        capture,
        scripts,
        Arc::new(MappingHandle::new()),
        config.dispatch_settings(),
    );

    match dispatcher.host_screen_size() {
        Ok((width, height)) => info!("Screen size: {}x{}", width, height),
        Err(e) => warn!("Could not query screen size: {}", e),
    }

    let app = router(AppState::new(dispatcher));

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Listening on {}", addr);
    info!("Health check available at http://localhost:{}/health", addr.port());

    axum::serve(listener, app).await?;

    Ok(())
}
