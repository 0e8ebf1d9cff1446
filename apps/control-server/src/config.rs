//! Layered server configuration: defaults, then an optional TOML file, then CLI flags.
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1"
//! port = 1412
//!
//! [mirror]
//! app_name = "iPhone Mirroring"
//!
//! [input]
//! default_type_interval_ms = 20
//!
//! [screenshot]
//! persist = false
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid bind address {0:?}")]
    BindAddress(String),
}

// ── CLI ──────────────────────────────────────────────────────────────────────

/// Local HTTP control endpoint for a mirrored device window.
#[derive(Debug, Default, Parser)]
#[command(name = "control-server", version)]
pub struct Cli {
    /// Port to listen on, given positionally; wins over `--port`
    #[arg(value_name = "PORT")]
    pub port_arg: Option<u16>,

    /// TCP port to listen on [default: 1412]
    #[arg(long, env = "MIRROR_CONTROL_PORT")]
    pub port: Option<u16>,

    /// Address to bind [default: 0.0.0.0]
    #[arg(long, env = "MIRROR_CONTROL_BIND")]
    pub bind: Option<String>,

    /// Optional TOML configuration file
    #[arg(long, env = "MIRROR_CONTROL_CONFIG")]
    pub config: Option<PathBuf>,

    /// `tracing` filter, e.g. `info` or `control_server=trace`
    #[arg(long)]
    pub log_level: Option<String>,
}

// ── File schema ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub mirror: MirrorSection,
    #[serde(default)]
    pub input: InputSection,
    #[serde(default)]
    pub screenshot: ScreenshotSection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Global `tracing` filter; unset keeps the built-in directives
    #[serde(default)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MirrorSection {
    /// Substring of the process name owning the mirror window
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Bound on one window query or keystroke script
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InputSection {
    /// Used when a `type` action passes no interval or zero
    #[serde(default = "default_type_interval_ms")]
    pub default_type_interval_ms: u64,
    #[serde(default = "default_move_duration_ms")]
    pub move_duration_ms: u64,
    #[serde(default = "default_drag_duration_ms")]
    pub drag_duration_ms: u64,
    /// Wheel units per scroll step
    #[serde(default = "default_scroll_unit")]
    pub scroll_unit: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenshotSection {
    #[serde(default = "default_true")]
    pub inline_data_url: bool,
    #[serde(default = "default_true")]
    pub persist: bool,
    #[serde(default = "std::env::temp_dir")]
    pub directory: PathBuf,
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    1412
}
fn default_app_name() -> String {
    window_locator::DEFAULT_APP_NAME.to_string()
}
fn default_query_timeout_ms() -> u64 {
    5000
}
fn default_type_interval_ms() -> u64 {
    20
}
fn default_move_duration_ms() -> u64 {
    200
}
fn default_drag_duration_ms() -> u64 {
    500
}
fn default_scroll_unit() -> i32 {
    20
}
fn default_true() -> bool {
    true
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            log_level: None,
        }
    }
}

impl Default for MirrorSection {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            query_timeout_ms: default_query_timeout_ms(),
        }
    }
}

impl Default for InputSection {
    fn default() -> Self {
        Self {
            default_type_interval_ms: default_type_interval_ms(),
            move_duration_ms: default_move_duration_ms(),
            drag_duration_ms: default_drag_duration_ms(),
            scroll_unit: default_scroll_unit(),
        }
    }
}

impl Default for ScreenshotSection {
    fn default() -> Self {
        Self {
            inline_data_url: true,
            persist: true,
            directory: std::env::temp_dir(),
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Defaults, overlaid with the file named by `--config`, overlaid with flags
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(port) = cli.port_arg.or(cli.port) {
            self.server.port = port;
        }
        if let Some(bind) = &cli.bind {
            self.server.bind = bind.clone();
        }
        if let Some(level) = &cli.log_level {
            self.server.log_level = Some(level.clone());
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .server
            .bind
            .parse()
            .map_err(|_| ConfigError::BindAddress(self.server.bind.clone()))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            app_name: self.mirror.app_name.clone(),
            script_timeout: Duration::from_millis(self.mirror.query_timeout_ms),
            default_type_interval: Duration::from_millis(self.input.default_type_interval_ms),
            move_duration: Duration::from_millis(self.input.move_duration_ms),
            drag_duration: Duration::from_millis(self.input.drag_duration_ms),
            scroll_unit: self.input.scroll_unit,
            screenshot: ScreenshotSettings {
                inline_data_url: self.screenshot.inline_data_url,
                persist: self.screenshot.persist,
                directory: self.screenshot.directory.clone(),
            },
        }
    }
}

// ── Dispatcher settings ──────────────────────────────────────────────────────

/// Tunables handed to the dispatcher at construction
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchSettings {
    pub app_name: String,
    pub script_timeout: Duration,
    pub default_type_interval: Duration,
    pub move_duration: Duration,
    pub drag_duration: Duration,
    pub scroll_unit: i32,
    pub screenshot: ScreenshotSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenshotSettings {
    pub inline_data_url: bool,
    pub persist: bool,
    pub directory: PathBuf,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        ServerConfig::default().dispatch_settings()
    }
}
