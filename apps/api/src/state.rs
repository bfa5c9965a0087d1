use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::TextModel;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// The model seam. Production wires a `GeminiClient`; tests wire fakes.
    pub model: Arc<dyn TextModel>,
    pub config: Config,
}
