use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::{GeminiClient, LlmClient, ModelOrchestrator, ModelSelector};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    /// Direct handle for Files API uploads and model listing; generation goes through `llm`.
    pub gemini: GeminiClient,
    pub config: Config,
}

impl AppState {
    /// Wires the Gemini client, model selector and orchestrator from config.
    pub fn new(db: PgPool, config: Config) -> Result<Self> {
        let gemini = GeminiClient::new(config.gemini_api_key.clone(), &config.gemini_api_base)
            .context("Failed to build the Gemini HTTP client")?;
        let selector = Arc::new(ModelSelector::new(&config.gemini_default_model));
        let orchestrator = ModelOrchestrator::new(
            Arc::new(gemini.clone()),
            selector,
            config.gemini_models.clone(),
            config.retry_policy(),
        );

        Ok(AppState {
            db,
            llm: LlmClient::new(orchestrator),
            gemini,
            config,
        })
    }
}
