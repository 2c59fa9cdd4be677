//! Orchestrator - End-to-end request handling
//!
//! Composes the planner, the plan executor, and response synthesis into one
//! request/response cycle. Owns the skill registry's lifecycle: the registry
//! is assembled by the caller before construction and immutable afterwards.

use crate::executor::{ExecutionResult, PlanExecutor, StepResult};
use crate::plan::Plan;
use crate::planner::Planner;
use factotum_llm::{CompletionRequest, LlmProvider, Message};
use factotum_skills::SkillRegistry;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};

const SYNTHESIS_MAX_TOKENS: u32 = 1000;

/// Outcome of one full request cycle
#[derive(Debug, Clone)]
pub struct ProcessOutcome {
    /// Aggregate execution success
    pub success: bool,
    /// User-facing reply text
    pub response: String,
    /// The plan that was executed
    pub plan: Plan,
    /// Per-step outcomes and final context
    pub execution_result: ExecutionResult,
    /// Wall-clock processing time, observational only
    pub duration_ms: u64,
}

/// The request-handling facade
pub struct Orchestrator {
    planner: Planner,
    executor: PlanExecutor,
    provider: Arc<dyn LlmProvider>,
    registry: Arc<SkillRegistry>,
}

impl Orchestrator {
    /// Create an orchestrator over an assembled registry and a provider.
    ///
    /// The same provider serves both planning and response synthesis.
    #[must_use]
    pub fn new(registry: Arc<SkillRegistry>, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            planner: Planner::new(Arc::clone(&provider)),
            executor: PlanExecutor::new(Arc::clone(&registry)),
            provider,
            registry,
        }
    }

    /// Override the executor, for a custom shared-field allow-list.
    #[must_use]
    pub fn with_executor(mut self, executor: PlanExecutor) -> Self {
        self.executor = executor;
        self
    }

    /// Override the planner, for a planning-specific model.
    #[must_use]
    pub fn with_planner(mut self, planner: Planner) -> Self {
        self.planner = planner;
        self
    }

    /// Get the skill registry
    #[must_use]
    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    /// Handle one user request end to end.
    ///
    /// Plans, executes, and synthesizes a reply. Every failure mode degrades
    /// to a structured outcome; this method never returns an error.
    #[instrument(skip(self))]
    pub async fn process(&self, user_input: &str) -> ProcessOutcome {
        let start = Instant::now();

        let plan = self
            .planner
            .analyze(user_input, &self.registry.describe())
            .await;
        let execution_result = self.executor.execute(&plan).await;
        let response = self
            .synthesize_response(user_input, &plan, &execution_result)
            .await;

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            success = execution_result.success,
            duration_ms, "Request processed"
        );

        ProcessOutcome {
            success: execution_result.success,
            response,
            plan,
            execution_result,
            duration_ms,
        }
    }

    /// Ask the provider for a user-friendly reply; fall back to a
    /// deterministic sentence when the call fails.
    async fn synthesize_response(
        &self,
        user_input: &str,
        plan: &Plan,
        execution_result: &ExecutionResult,
    ) -> String {
        let summary = execution_result
            .step_results
            .iter()
            .map(summarize_step)
            .collect::<Vec<_>>()
            .join("\n");
        let details = serde_json::to_string_pretty(&execution_result.step_results)
            .unwrap_or_else(|_| "[]".to_string());

        let prompt = format!(
            r#"Write a friendly reply to the user based on the execution results.

User input: "{user_input}"

Plan intent: {intent}

Execution summary:
{summary}

Detailed data:
{details}

Requirements:
1. Summarize the outcome in natural language.
2. Lead with what the user cares about (order status, stock levels, ...).
3. If something failed, say so kindly.
4. No technical details (step numbers, skill names).
5. Keep it short, 3-5 sentences.

Return only the reply text, no extra formatting."#,
            intent = plan.intent,
        );

        let request = CompletionRequest::new(self.provider.default_model().to_string())
            .with_message(Message::user(prompt))
            .with_max_tokens(SYNTHESIS_MAX_TOKENS);

        match self.provider.complete(request).await {
            Ok(response) => response.content.trim().to_string(),
            Err(e) => {
                error!(error = %e, "Response synthesis failed, using fallback");
                fallback_response(plan, execution_result.success)
            }
        }
    }
}

/// One-line summary of a step result for the synthesis prompt.
fn summarize_step(result: &StepResult) -> String {
    let mut summary = format!("step {} ({}): ", result.step, result.skill);
    if result.success {
        summary.push_str("ok");
        if let Some(data) = result.result.as_ref().and_then(Value::as_object) {
            if let Some(order_id) = data.get("order_id").and_then(Value::as_str) {
                summary.push_str(&format!(" - order {}", order_id));
            }
            if let Some(status) = data.get("status").and_then(Value::as_str) {
                summary.push_str(&format!(" - status {}", status));
            }
        }
    } else {
        let reason = result.error.as_deref().unwrap_or("unknown error");
        summary.push_str(&format!("failed - {}", reason));
    }
    summary
}

/// Deterministic reply used when synthesis is unavailable.
fn fallback_response(plan: &Plan, success: bool) -> String {
    if success {
        format!("Your request is done: {}", plan.intent)
    } else {
        format!("There was a problem handling your request: {}", plan.intent)
    }
}
