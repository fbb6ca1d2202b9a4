//! Shared application state for the web server.

use std::sync::Arc;

use papyrix_model::TextGenerator;

/// Shared state injected into every Axum handler. The generator is loaded
/// once at startup and held for the process lifetime.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

pub type SharedState = Arc<AppState>;
