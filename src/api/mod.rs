//! HTTP API routes

pub mod chat;
pub mod health;
pub mod skills;

use crate::server::AppState;
use axum::routing::{get, post};
use axum::Router;

/// Build the API router
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat::chat))
        .route("/api/skills", get(skills::list_skills))
        .route("/health", get(health::health_check))
        .with_state(state)
}
