//! Application state shared across all handlers.

use std::sync::Arc;

use revhub_core::config::AppConfig;
use revhub_service::VersioningService;

/// Shared application state passed to every handler via Axum's `State`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// The versioning engine.
    pub versioning: Arc<VersioningService>,
}

impl AppState {
    /// Bundle configuration and engine into handler state.
    pub fn new(config: AppConfig, versioning: VersioningService) -> Self {
        Self {
            config: Arc::new(config),
            versioning: Arc::new(versioning),
        }
    }
}
