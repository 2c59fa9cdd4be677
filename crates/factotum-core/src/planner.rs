//! Planner - Natural language to execution plan conversion
//!
//! Wraps an [`LlmProvider`] with the planning prompt and output recovery.
//! The planner never fails outward: transport errors and unparseable
//! replies both degrade to a failure [`Plan`] with the error recorded, so
//! the executor and facade see one uniform shape.

use crate::error::{Error, Result};
use crate::plan::Plan;
use factotum_llm::{CompletionRequest, LlmProvider, Message};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

const PLANNING_MAX_TOKENS: u32 = 2000;

/// Planner for converting user requests into execution plans
pub struct Planner {
    provider: Arc<dyn LlmProvider>,
    model: Option<String>,
}

impl Planner {
    /// Create a planner using the provider's default model
    #[must_use]
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            model: None,
        }
    }

    /// Override the model used for planning calls
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    fn model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    /// Analyze a user request against the skill catalogue and produce a plan.
    ///
    /// Degrades to a failure plan (zero steps, `error` set) when the LLM
    /// call fails or its reply cannot be parsed; never returns an error.
    #[instrument(skip(self, skill_catalogue))]
    pub async fn analyze(&self, user_input: &str, skill_catalogue: &str) -> Plan {
        match self.request_plan(user_input, skill_catalogue).await {
            Ok(plan) => {
                info!(intent = %plan.intent, steps = plan.steps.len(), "Intent analyzed");
                plan
            }
            Err(e @ Error::PlanParsing(_)) => {
                error!(error = %e, "Planner reply not parseable");
                Plan::failure("parse failed", e.to_string())
            }
            Err(e) => {
                error!(error = %e, "Planning call failed");
                Plan::failure("analysis failed", e.to_string())
            }
        }
    }

    async fn request_plan(&self, user_input: &str, skill_catalogue: &str) -> Result<Plan> {
        let prompt = build_planning_prompt(user_input, skill_catalogue);
        let request = CompletionRequest::new(self.model())
            .with_message(Message::user(prompt))
            .with_max_tokens(PLANNING_MAX_TOKENS);

        let response = self.provider.complete(request).await?;
        Plan::from_llm_text(&response.content)
    }
}

fn build_planning_prompt(user_input: &str, skill_catalogue: &str) -> String {
    debug!(input_len = user_input.len(), "Building planning prompt");
    format!(
        r#"You are the orchestrator of a business assistant. Analyze the user request and produce an execution plan.

User input: "{user_input}"

Available skills:
{skill_catalogue}

Important:
- Product IDs are single letters or digits; when the user says "product A", product_id is "A".
- Order numbers are complete digit strings.
- If a task needs several steps, list them in order.
- Each step invokes exactly one skill.
- A step param written as "$key" is filled in from an earlier step's result.

Return the execution plan strictly in this JSON format:
{{
  "intent": "short description of the user's intent",
  "steps": [
    {{
      "step": 1,
      "skill": "skill name",
      "params": {{"param name": "param value"}},
      "description": "what this step does"
    }}
  ],
  "final_response_template": "reply template for the user"
}}

Examples:
User: "check stock for product A"
-> {{"intent": "check inventory", "steps": [{{"step": 1, "skill": "query_inventory", "params": {{"product_id": "A"}}, "description": "check stock for product A"}}]}}

User: "order 12345 is delayed, send the customer an apology email"
-> {{"intent": "handle delayed order", "steps": [
    {{"step": 1, "skill": "get_order", "params": {{"order_id": "12345"}}, "description": "look up the order"}},
    {{"step": 2, "skill": "send_notification", "params": {{"to": "$customer_email", "template": "order_delay", "context": {{}}}}, "description": "send the apology email"}}
]}}

Return ONLY the JSON, nothing else."#
    )
}
