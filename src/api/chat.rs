//! Chat endpoint
//!
//! One request runs the full cycle: plan, execute, synthesize. The reply
//! carries the user-facing message plus a debug block with the intent,
//! per-step outcomes, and timing for the dashboard.

use crate::server::AppState;
use axum::extract::State;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

/// Chat request body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    /// The user's natural-language request
    pub user_input: String,
    /// Caller identity, informational
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_user_id() -> String {
    "default".to_string()
}

/// Chat response body
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Aggregate execution success
    pub success: bool,
    /// User-facing reply text
    pub message: String,
    /// Planning error, when planning failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Execution diagnostics
    pub debug: DebugInfo,
}

/// Execution diagnostics attached to every reply
#[derive(Debug, Serialize)]
pub struct DebugInfo {
    /// Request id, for log correlation
    pub request_id: String,
    /// Recognized intent
    pub intent: String,
    /// Per-step outcomes
    pub steps: Vec<Value>,
    /// Final shared context after all steps ran
    pub context: Value,
    /// Wall-clock processing time
    pub execution_time_ms: u64,
}

/// Handle one chat request
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let request_id = Uuid::new_v4().to_string();
    info!(%request_id, user_id = %request.user_id, input = %request.user_input, "Chat request received");

    let outcome = state.orchestrator.process(&request.user_input).await;

    let steps = outcome
        .execution_result
        .step_results
        .iter()
        .filter_map(|r| serde_json::to_value(r).ok())
        .collect();

    Json(ChatResponse {
        success: outcome.success,
        message: outcome.response,
        error: outcome.plan.error.clone(),
        debug: DebugInfo {
            request_id,
            intent: outcome.plan.intent.clone(),
            steps,
            context: outcome.execution_result.context.to_json(),
            execution_time_ms: outcome.duration_ms,
        },
    })
}
