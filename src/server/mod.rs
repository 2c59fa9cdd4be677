//! HTTP server assembly
//!
//! Builds the skill registry and LLM provider from configuration, wires the
//! orchestrator, and serves the API. All mock-versus-backend branching
//! happens here; the orchestrator receives a fully assembled registry.

pub mod config;

use crate::api;
use anyhow::{bail, Context, Result};
use axum::Router;
use config::AppConfig;
use factotum_core::{Orchestrator, PlanExecutor, Planner};
use factotum_llm::{AnthropicConfig, AnthropicProvider, LlmProvider, MockProvider};
use factotum_skills::builtins::{
    register_backend_skills, register_mock_skills, BackendConfig, MailerConfig,
};
use factotum_skills::SkillRegistry;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared per-request state
#[derive(Clone)]
pub struct AppState {
    /// The request-handling facade
    pub orchestrator: Arc<Orchestrator>,
}

/// Assemble the skill registry the configuration asks for.
pub fn build_registry(config: &AppConfig) -> Result<SkillRegistry> {
    let mut registry = SkillRegistry::new();
    match config.skills.mode.as_str() {
        "mock" => {
            register_mock_skills(&mut registry)?;
        }
        "backend" => {
            let backend = BackendConfig::new(&config.skills.backend_url)
                .with_timeout(Duration::from_secs(config.skills.timeout_secs));
            let mailer = match &config.skills.mail_webhook_url {
                Some(url) => MailerConfig::webhook(url),
                None => MailerConfig::mock(),
            };
            register_backend_skills(&mut registry, &backend, &mailer)?;
        }
        other => bail!("unknown skill mode: {other} (expected \"mock\" or \"backend\")"),
    }
    info!(mode = %config.skills.mode, skills = registry.len(), "Skill registry assembled");
    Ok(registry)
}

/// Build the LLM provider the configuration asks for.
pub fn build_provider(config: &AppConfig) -> Result<Arc<dyn LlmProvider>> {
    match config.llm.provider.as_str() {
        "anthropic" => {
            let mut anthropic =
                AnthropicConfig::from_env().context("Anthropic provider not configured")?;
            if let Some(model) = &config.llm.model {
                anthropic = anthropic.with_model(model);
            }
            Ok(Arc::new(AnthropicProvider::new(anthropic)?))
        }
        "mock" => Ok(Arc::new(MockProvider::new())),
        other => bail!("unknown LLM provider: {other} (expected \"anthropic\" or \"mock\")"),
    }
}

/// Wire the orchestrator from configuration.
pub fn build_orchestrator(config: &AppConfig) -> Result<Orchestrator> {
    let registry = Arc::new(build_registry(config)?);
    let provider = build_provider(config)?;
    let executor = PlanExecutor::new(Arc::clone(&registry))
        .with_shared_fields(config.skills.shared_fields.clone());
    let mut orchestrator =
        Orchestrator::new(registry, Arc::clone(&provider)).with_executor(executor);
    if let Some(model) = &config.llm.model {
        orchestrator = orchestrator.with_planner(Planner::new(provider).with_model(model));
    }
    Ok(orchestrator)
}

/// Build the application router over the given state.
pub fn build_router(state: AppState) -> Router {
    api::routes(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Run the server until shutdown.
pub async fn run(config: AppConfig) -> Result<()> {
    let orchestrator = Arc::new(build_orchestrator(&config)?);
    let state = AppState { orchestrator };
    let router = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Factotum listening");

    axum::serve(listener, router)
        .await
        .context("server error")?;
    Ok(())
}
