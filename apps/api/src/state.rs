use std::sync::Arc;

use crate::config::Config;
use crate::extraction::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Read-only after startup; shared by every request.
    pub pipeline: Arc<Pipeline>,
    pub config: Config,
}
