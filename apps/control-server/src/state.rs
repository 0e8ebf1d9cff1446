//! Shared handler state

use std::sync::Arc;

use crate::dispatch::ActionDispatcher;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<ActionDispatcher>,
}

impl AppState {
    pub fn new(dispatcher: ActionDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
        }
    }
}
