//! Mirror Control Server
//!
//! HTTP endpoint that turns click, drag, type, scroll and screenshot requests
//! into host input, mapping mirrored-device coordinates onto the host display.

pub mod config;
pub mod dispatch;
pub mod routes;
pub mod state;
pub mod text_input;

pub use config::{Cli, ConfigError, DispatchSettings, ServerConfig};
pub use dispatch::{ActionDispatcher, scroll_clicks};
pub use routes::router;
pub use state::AppState;
